use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The board snapshot was written or replaced.
    SnapshotChanged,
}

/// Watches one board snapshot file for changes.
///
/// The parent directory is watched rather than the file, so editors that
/// save by rename are still seen.
pub struct SnapshotWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl SnapshotWatcher {
    /// Start watching `snapshot`. Call `poll()` each tick.
    pub fn start(snapshot: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target = snapshot
            .canonicalize()
            .unwrap_or_else(|_| snapshot.to_path_buf());
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = target.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                if !is_write(&event.kind) {
                    return;
                }
                let hit = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if hit {
                    let _ = tx.send(FileEvent::SnapshotChanged);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(SnapshotWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Bursts of writes collapse into one event.
    pub fn poll(&self) -> Option<FileEvent> {
        let mut changed = None;
        while let Ok(evt) = self.rx.try_recv() {
            changed = Some(evt);
        }
        changed
    }
}

fn is_write(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    #[test]
    fn test_only_writes_count() {
        assert!(is_write(&EventKind::Create(CreateKind::File)));
        assert!(is_write(&EventKind::Modify(ModifyKind::Any)));
        assert!(!is_write(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_write(&EventKind::Access(notify::event::AccessKind::Any)));
    }
}
