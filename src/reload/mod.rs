//! Live-reload broadcaster.
//!
//! A dedicated WebSocket server on a fixed secondary port. It watches the
//! compiled-CSS directory and the theme's top-level templates; when either
//! changes, every connected browser client is told to refresh. The
//! browser-side script is embedded in the binary and served by the
//! template server at `/livereload.js`.

mod message;
mod server;

pub use message::ReloadMessage;
pub use server::{Broadcaster, RELOAD_PORT};

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Result;

use crate::config::{Config, TEMPLATE_SUFFIX};
use crate::watch::{FsWatcher, WatchRoot};

/// Bind the broadcaster on the fixed port and spawn its watch loop.
pub fn start(config: Arc<Config>) -> Result<()> {
    let broadcaster = Broadcaster::new();
    broadcaster.bind(RELOAD_PORT)?;
    crate::log!("reload"; "ws://localhost:{}", RELOAD_PORT);

    thread::spawn(move || watch_loop(&config, &broadcaster));
    Ok(())
}

fn watch_loop(config: &Config, broadcaster: &Broadcaster) {
    // css/ recursively, theme root flat (top-level templates only)
    let roots = [
        WatchRoot::recursive(config.css_dir()),
        WatchRoot::flat(config.theme_dir()),
    ];

    match FsWatcher::new(&roots) {
        Ok(watcher) => watcher.run(|changes| {
            if let Some(reason) = reload_reason(&changes, config) {
                crate::debug!("reload"; "{}", reason);
                broadcaster.broadcast(&ReloadMessage::reload_with_reason(reason));
            }
        }),
        Err(e) => crate::log!("reload"; "cannot watch theme: {}", e),
    }
}

/// First reload-worthy change in the batch, as a human-readable reason.
///
/// Reload-worthy: anything under `css/`, or a top-level template file.
fn reload_reason(changes: &[PathBuf], config: &Config) -> Option<String> {
    let css_dir = config.css_dir();
    let theme_dir = config.theme_dir();

    changes.iter().find_map(|path| {
        let name = path.file_name()?.to_str()?;
        let worthy = path.starts_with(&css_dir)
            || (path.parent() == Some(theme_dir.as_path()) && name.ends_with(TEMPLATE_SUFFIX));
        worthy.then(|| format!("{name} updated"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_config() -> Config {
        Config::for_root(Path::new("/work"), "shop", 3000)
    }

    #[test]
    fn test_css_change_triggers_reload() {
        let config = test_config();
        let changes = vec![PathBuf::from("/work/shop/css/bootstrap.css")];
        assert_eq!(
            reload_reason(&changes, &config).as_deref(),
            Some("bootstrap.css updated")
        );
    }

    #[test]
    fn test_top_level_template_triggers_reload() {
        let config = test_config();
        let changes = vec![PathBuf::from("/work/shop/home.liquid")];
        assert_eq!(
            reload_reason(&changes, &config).as_deref(),
            Some("home.liquid updated")
        );
    }

    #[test]
    fn test_other_changes_ignored() {
        let config = test_config();
        // Assets and scss sources are not reload-worthy; scss changes
        // reach the browser via the compiled css write instead
        let changes = vec![
            PathBuf::from("/work/shop/logo.png"),
            PathBuf::from("/work/shop/scss/bootstrap.scss"),
            PathBuf::from("/work/shop/partials/nav.liquid"),
        ];
        assert_eq!(reload_reason(&changes, &config), None);
    }
}
