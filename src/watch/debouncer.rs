//! Event debouncing for the filesystem watcher.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::utils::path::normalize_path;

/// Default quiet period before accumulated changes flush.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Pure debouncer: only handles timing and event deduplication.
/// No business logic, no global state access.
pub struct Debouncer {
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
    debounce: Duration,
}

impl Debouncer {
    pub fn new(debounce: Duration) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            debounce,
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Removed + Created/Modified → Created/Modified (file was restored)
    /// - Modified + Removed → Removed (file was deleted)
    /// - Created + Removed → discard (appeared then vanished)
    /// - Same type events: first event wins
    pub fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // Ignore metadata-only changes (mtime/atime/chmod noise)
                // may trigger endless rebuild loops
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }

            let path = normalize_path(path);

            if let Some(&existing) = self.changes.get(&path) {
                match (existing, kind) {
                    (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                        crate::debug!("watch"; "restore {}->{}: {}", existing.label(), kind.label(), path.display());
                        self.changes.insert(path, kind);
                    }
                    (ChangeKind::Modified, ChangeKind::Removed) => {
                        crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                        self.changes.insert(path, ChangeKind::Removed);
                    }
                    (ChangeKind::Created, ChangeKind::Removed) => {
                        crate::debug!("watch"; "discard created+removed: {}", path.display());
                        self.changes.remove(&path);
                    }
                    _ => {
                        // Same kind or other combos (Created+Modified, etc.) → first wins
                        continue;
                    }
                }
                self.last_event = Some(Instant::now());
                continue;
            }

            crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
            self.changes.insert(path, kind);
            self.last_event = Some(Instant::now());
        }
    }

    /// Take accumulated changes if the quiet period elapsed.
    pub fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }

        self.last_event = None;
        let changes = std::mem::take(&mut self.changes);
        if changes.is_empty() {
            return None;
        }
        Some(changes)
    }

    /// Take whatever accumulated, quiet period or not.
    ///
    /// Used when the event source disconnects and nothing further can
    /// arrive to extend the quiet period.
    pub fn take_all(&mut self) -> FxHashMap<PathBuf, ChangeKind> {
        self.last_event = None;
        std::mem::take(&mut self.changes)
    }

    fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < self.debounce {
            return false;
        }

        !self.changes.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        self.debounce
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
