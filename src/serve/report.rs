//! Startup reporter: lists discoverable template URLs.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::{Config, MARKUP_SUFFIX, TEMPLATE_SUFFIX};

/// Print a local URL for every top-level template/markup file.
///
/// A scan failure is logged and serving continues regardless.
pub fn print_templates(config: &Config) {
    let dir = config.theme_dir();
    match template_urls(&dir, config.port) {
        Ok(urls) => {
            for url in urls {
                crate::log!("serve"; "{}", url);
            }
        }
        Err(e) => crate::log!("serve"; "unable to scan {}: {}", dir.display(), e),
    }
}

/// Enumerate template URLs from the theme directory (non-recursive).
fn template_urls(dir: &Path, port: u16) -> io::Result<Vec<String>> {
    let mut urls = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(TEMPLATE_SUFFIX) || name.ends_with(MARKUP_SUFFIX) {
            urls.push(format!("http://localhost:{port}/{name}"));
        }
    }

    urls.sort();
    Ok(urls)
}
