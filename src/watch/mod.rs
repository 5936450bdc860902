//! Filesystem watch loop.
//!
//! The loop is an explicit event subscription: notify events arrive on a
//! channel, pass through the [`Debouncer`], and flush to a callback. A
//! separate cancellation channel stops the loop, so tests drive it with
//! synthetic events and a deterministic stop instead of process exit.

mod debouncer;

pub use debouncer::{ChangeKind, DEBOUNCE, Debouncer};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashMap;

use crate::log;

/// Upper bound on one channel wait, so cancellation is checked regularly.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A running filesystem watcher feeding an event channel.
///
/// Dropping this stops the underlying OS watch.
pub struct WatchSubscription {
    // Held for its Drop; the OS watch is deregistered with it
    _watcher: notify::RecommendedWatcher,
    pub events: Receiver<notify::Event>,
}

/// Subscribe to change events under `path` (recursive).
pub fn subscribe(path: &Path) -> Result<WatchSubscription> {
    let (tx, rx): (Sender<notify::Event>, Receiver<notify::Event>) = unbounded();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => log!("watch"; "watch error: {}", e),
        }
    })
    .context("failed to create filesystem watcher")?;

    watcher
        .watch(path, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", path.display()))?;

    Ok(WatchSubscription {
        _watcher: watcher,
        events: rx,
    })
}

/// Drive the debounced event loop until cancelled.
///
/// `on_changes` receives each flushed batch. The loop ends when `cancel`
/// fires or when the event source disconnects (remaining changes are
/// flushed first in the latter case).
pub fn event_loop<F>(
    events: &Receiver<notify::Event>,
    cancel: &Receiver<()>,
    mut debouncer: Debouncer,
    mut on_changes: F,
) where
    F: FnMut(FxHashMap<PathBuf, ChangeKind>),
{
    loop {
        if cancel.try_recv().is_ok() {
            return;
        }

        let timeout = debouncer.sleep_duration().min(POLL_INTERVAL);
        match events.recv_timeout(timeout) {
            Ok(event) => debouncer.add_event(&event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                let changes = debouncer.take_all();
                if !changes.is_empty() {
                    on_changes(changes);
                }
                return;
            }
        }

        if let Some(changes) = debouncer.take_if_ready() {
            on_changes(changes);
        }
    }
}
