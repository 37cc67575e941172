//! Debounced filesystem watching.
//!
//! Wraps `notify` into a blocking watch-and-react loop:
//!
//! ```text
//! Watcher -> channel -> Debouncer (stability window) -> callback
//! ```
//!
//! The initial directory scan produces no events; a burst of writes within
//! the stability window collapses into a single callback invocation.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Quiet period after the last event before the callback fires
const DEBOUNCE_MS: u64 = 500;
/// Tick interval for checking whether the quiet period elapsed
const POLL_INTERVAL_MS: u64 = 100;

/// Check if path is a temp/backup file (editor artifacts)
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

/// A directory to watch and how deep to watch it
pub struct WatchRoot {
    pub path: PathBuf,
    pub recursive: bool,
}

impl WatchRoot {
    pub fn recursive(path: PathBuf) -> Self {
        Self {
            path,
            recursive: true,
        }
    }

    pub fn flat(path: PathBuf) -> Self {
        Self {
            path,
            recursive: false,
        }
    }
}

/// Debounced filesystem watcher over a set of roots
pub struct FsWatcher {
    /// Channel carrying raw notify events
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
}

impl FsWatcher {
    /// Create a watcher over `roots`, skipping roots that do not exist yet.
    ///
    /// Events start buffering in the channel immediately, so nothing is
    /// lost between construction and the first `run()` poll.
    pub fn new(roots: &[WatchRoot]) -> notify::Result<Self> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;

        for root in roots {
            if !root.path.exists() {
                continue;
            }
            let mode = if root.recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher.watch(&root.path, mode)?;
        }

        Ok(Self {
            rx,
            _watcher: watcher,
        })
    }

    /// Blocking watch loop: invokes `on_change` with each settled batch of
    /// changed paths until shutdown is requested.
    pub fn run<F: FnMut(Vec<PathBuf>)>(self, mut on_change: F) {
        let mut debouncer = Debouncer::new();
        let tick = Duration::from_millis(POLL_INTERVAL_MS);

        loop {
            match self.rx.recv_timeout(tick) {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if crate::core::is_shutdown() {
                break;
            }

            if let Some(changes) = debouncer.take_if_ready() {
                on_change(changes);
            }
        }
    }
}

// =============================================================================
// Debouncer - timing and event deduplication
// =============================================================================

/// Pure debouncer: collects changed paths and releases them once the
/// stability window has passed without further events.
struct Debouncer {
    /// Changed paths (dedup is free via set membership)
    changes: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            changes: FxHashSet::default(),
            last_event: None,
        }
    }

    /// Add a notify event, ignoring metadata-only noise and temp files.
    fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => {}
            EventKind::Modify(modify) => {
                // Metadata-only changes (mtime/atime/chmod noise) would
                // trigger endless recompile loops
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
            }
            _ => return,
        }

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            crate::debug!("watch"; "event: {}", path.display());
            self.changes.insert(path.clone());
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the accumulated paths if the stability window has elapsed.
    fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if !self.is_ready() {
            return None;
        }

        self.last_event = None;
        let changes: Vec<_> = std::mem::take(&mut self.changes).into_iter().collect();
        if changes.is_empty() {
            return None;
        }
        Some(changes)
    }

    fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        last_event.elapsed() >= Duration::from_millis(DEBOUNCE_MS) && !self.changes.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify_kind() -> notify::EventKind {
        notify::EventKind::Modify(notify::event::ModifyKind::Data(
            notify::event::DataChange::Any,
        ))
    }

    fn create_kind() -> notify::EventKind {
        notify::EventKind::Create(notify::event::CreateKind::File)
    }

    fn metadata_kind() -> notify::EventKind {
        notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
            notify::event::MetadataKind::Any,
        ))
    }

    #[test]
    fn test_debouncer_empty() {
        let debouncer = Debouncer::new();
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_event_collection() {
        let mut debouncer = Debouncer::new();

        debouncer.add_event(&make_event(vec!["/tmp/a.scss"], create_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/b.scss"], modify_kind()));

        assert_eq!(debouncer.changes.len(), 2);
        assert!(debouncer.changes.contains(&PathBuf::from("/tmp/a.scss")));
    }

    #[test]
    fn test_dedup_by_path() {
        let mut debouncer = Debouncer::new();

        // Burst of writes to the same file collapses to one entry
        debouncer.add_event(&make_event(vec!["/tmp/a.scss"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/a.scss"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/a.scss"], create_kind()));

        assert_eq!(debouncer.changes.len(), 1);
    }

    #[test]
    fn test_temp_file_ignored() {
        let mut debouncer = Debouncer::new();

        debouncer.add_event(&make_event(vec!["/tmp/.a.scss.swp"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/a.scss~"], modify_kind()));
        debouncer.add_event(&make_event(vec!["/tmp/a.bak"], modify_kind()));

        assert!(debouncer.changes.is_empty());
        assert!(debouncer.last_event.is_none());
    }

    #[test]
    fn test_metadata_only_ignored() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/tmp/a.scss"], metadata_kind()));
        assert!(debouncer.changes.is_empty());
    }

    #[test]
    fn test_not_ready_within_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/tmp/a.scss"], modify_kind()));

        // Window has not elapsed yet
        assert!(!debouncer.is_ready());
        assert!(debouncer.take_if_ready().is_none());
    }

    #[test]
    fn test_ready_after_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&make_event(vec!["/tmp/a.scss"], modify_kind()));

        // Backdate the last event past the stability window
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 100));
        assert!(debouncer.is_ready());

        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes, vec![PathBuf::from("/tmp/a.scss")]);

        // Drained: a second take yields nothing
        assert!(debouncer.take_if_ready().is_none());
    }
}
