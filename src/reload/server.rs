//! WebSocket server for live reload.
//!
//! Binds the notification port, accepts browser clients on a background
//! thread, and broadcasts [`ReloadMessage`]s to every connected client.
//! Clients whose send fails are pruned on the spot.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::{Message, WebSocket};

use super::ReloadMessage;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Shared handle to the reload client registry.
#[derive(Clone)]
pub struct ReloadHandle {
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
    port: u16,
}

impl ReloadHandle {
    /// Bound notification port (may differ from the configured port after retry).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Currently connected client count.
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Send a message to all connected clients, pruning dead ones.
    pub fn broadcast(&self, msg: &ReloadMessage) {
        let text = msg.to_json();
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("reload"; "no clients connected");
            return;
        }

        clients.retain_mut(|client| match client.send(Message::text(text.clone())) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast to {} clients", count);
    }
}

/// Start the reload listener.
///
/// Binds `base_port` (retrying consecutive ports if in use) and spawns the
/// acceptor thread. Returns a handle for broadcasting.
pub fn start(base_port: u16) -> Result<ReloadHandle> {
    let (listener, actual_port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;

    let clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>> = Arc::new(Mutex::new(Vec::new()));
    let handle = ReloadHandle {
        clients: Arc::clone(&clients),
        port: actual_port,
    };

    // Acceptor thread: blocking accept loop for the process lifetime
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    crate::log!("reload"; "accept error: {}", e);
                    continue;
                }
            };

            if let Ok(addr) = stream.peer_addr() {
                crate::debug!("reload"; "client connected: {}", addr);
            }

            match tungstenite::accept(stream) {
                Ok(mut ws) => {
                    // Handshake confirmation; a client that already hung up
                    // is dropped instead of registered
                    if ws.send(Message::text(ReloadMessage::connected().to_json())).is_ok() {
                        clients.lock().push(ws);
                    }
                }
                Err(e) => {
                    crate::debug!("reload"; "websocket handshake failed: {}", e);
                }
            }
        }
    });

    Ok(handle)
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("127.0.0.1:{}", port)) {
            Ok(listener) => {
                if offset > 0 {
                    crate::log!("reload"; "port {} in use, using {} instead", base_port, port);
                }
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind reload listener after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
