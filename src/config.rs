//! Immutable process configuration.
//!
//! Built once from CLI arguments at startup and passed explicitly to every
//! component. All filesystem-convention paths derive from here:
//!
//! ```text
//! <cwd>/<shop>/
//!   scss/bootstrap.scss        compiler entry point
//!   css/bootstrap.css(.map)    compiler output, overwritten each run
//!   *.liquid, *.html, ...      templates and assets served over HTTP
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::Cli;

/// File suffix that marks a template route
pub const TEMPLATE_SUFFIX: &str = ".liquid";

/// File suffix for plain markup pages listed at startup
pub const MARKUP_SUFFIX: &str = ".html";

/// Process configuration, immutable for the process lifetime
#[derive(Debug, Clone)]
pub struct Config {
    /// Shop/theme identifier, names the subdirectory under `root`
    pub shop: String,
    /// Template server port
    pub port: u16,
    /// Working directory the shop directory lives under
    root: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = std::env::current_dir().context("cannot determine working directory")?;
        Ok(Self {
            shop: cli.shop.clone(),
            port: cli.port,
            root,
        })
    }

    /// Root directory of the served theme: `<cwd>/<shop>`
    pub fn theme_dir(&self) -> PathBuf {
        self.root.join(&self.shop)
    }

    /// Watched stylesheet source directory
    pub fn scss_dir(&self) -> PathBuf {
        self.theme_dir().join("scss")
    }

    /// Fixed stylesheet entry point
    pub fn scss_entry(&self) -> PathBuf {
        self.scss_dir().join("bootstrap.scss")
    }

    /// Compiled stylesheet output directory
    pub fn css_dir(&self) -> PathBuf {
        self.theme_dir().join("css")
    }

    /// Compiled stylesheet output path
    pub fn css_out(&self) -> PathBuf {
        self.css_dir().join("bootstrap.css")
    }

    /// Source map output path
    pub fn css_map_out(&self) -> PathBuf {
        self.css_dir().join("bootstrap.css.map")
    }

    /// Build a config rooted somewhere other than the working directory.
    #[cfg(test)]
    pub fn for_root(root: &std::path::Path, shop: &str, port: u16) -> Self {
        Self {
            shop: shop.to_string(),
            port,
            root: root.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_derived_paths() {
        let config = Config::for_root(Path::new("/work"), "apollo-1", 3000);
        assert_eq!(config.theme_dir(), Path::new("/work/apollo-1"));
        assert_eq!(
            config.scss_entry(),
            Path::new("/work/apollo-1/scss/bootstrap.scss")
        );
        assert_eq!(
            config.css_out(),
            Path::new("/work/apollo-1/css/bootstrap.css")
        );
        assert_eq!(
            config.css_map_out(),
            Path::new("/work/apollo-1/css/bootstrap.css.map")
        );
    }
}
