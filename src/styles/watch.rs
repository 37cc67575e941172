//! Watch-and-recompile loop for the style compiler trigger.

use std::error::Error;
use std::sync::Arc;
use std::thread;

use super::compile;
use crate::config::Config;
use crate::logger;
use crate::watch::{FsWatcher, WatchRoot};

/// Run one unconditional compile, then watch `scss/` for changes.
///
/// All compiles run on the single watcher thread, so concurrent change
/// bursts can never interleave writes to the output files.
pub fn start(config: Arc<Config>) {
    run_compile(&config);

    thread::spawn(move || {
        let roots = [WatchRoot::recursive(config.scss_dir())];
        match FsWatcher::new(&roots) {
            Ok(watcher) => watcher.run(|changes| {
                crate::debug!("styles"; "{} stylesheet file(s) changed", changes.len());
                run_compile(&config);
            }),
            Err(e) => {
                crate::log!("styles"; "cannot watch {}: {}", config.scss_dir().display(), e);
            }
        }
    });
}

/// Compile once; failures are logged and leave previous output in place.
fn run_compile(config: &Config) {
    match compile::compile_theme(config) {
        Ok(()) => logger::status_success(&format!("compiled {}", config.css_out().display())),
        Err(e) => {
            let detail = match e.source() {
                Some(src) => format!("{e}: {src}"),
                None => e.to_string(),
            };
            logger::status_error("stylesheet compile failed", &detail);
        }
    }
}
