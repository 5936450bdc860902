//! Process-wide run state for serve/watch mode.
//!
//! Two concerns live here:
//! - `SHUTDOWN`: has Ctrl+C been received?
//! - server registration, so the Ctrl+C handler can unblock the preview
//!   server's request loop instead of killing the process mid-write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam::channel::Sender;
use parking_lot::Mutex;
use tiny_http::Server;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Subscribers notified when shutdown is requested (watch loops)
static SHUTDOWN_SUBSCRIBERS: Mutex<Vec<Sender<()>>> = Mutex::new(Vec::new());

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a server has been registered:
/// - Before `register_server()`: sets SHUTDOWN, notifies subscribers, exits
/// - After `register_server()`: graceful shutdown (unblock request loop)
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        for tx in SHUTDOWN_SUBSCRIBERS.lock().iter() {
            let _ = tx.send(());
        }

        // Unblock HTTP server, or exit immediately if not yet serving
        if let Some(server) = SERVER.get() {
            crate::log!("serve"; "shutting down...");
            server.unblock();
        } else {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Subscribe to the shutdown signal.
///
/// Returns a receiver that fires once when Ctrl+C is received. Watch loops
/// use this as their cancellation channel.
pub fn subscribe_shutdown() -> crossbeam::channel::Receiver<()> {
    let (tx, rx) = crossbeam::channel::bounded(1);
    SHUTDOWN_SUBSCRIBERS.lock().push(tx);
    rx
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering for performance - worst case is serving
/// a few more requests before stopping, which is acceptable
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Tests
// =============================================================================
