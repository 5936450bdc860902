//! Static preview server for the theme directory.
//!
//! Serves the theme tree over HTTP so built assets are viewable during
//! development, injecting the reload client script into HTML responses.

mod response;

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Result;
use tiny_http::{Request, Server};

use crate::config::PatinaConfig;
use crate::log;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    root: PathBuf,
    reload_port: Option<u16>,
}

/// Bind the HTTP preview server without starting the request loop
///
/// This allows the caller to decide whether the loop runs on the current
/// thread (`run`) or a background one (`run_background`).
pub fn bind(config: &PatinaConfig, reload_port: Option<u16>) -> Result<BoundServer> {
    let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    crate::core::register_server(Arc::clone(&server));
    log!("serve"; "http://{}", addr);
    if let Some(port) = reload_port {
        crate::debug!("reload"; "ws://localhost:{}", port);
    }

    Ok(BoundServer {
        server,
        addr,
        root: config.get_root().to_path_buf(),
        reload_port,
    })
}

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(interface: std::net::IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        run_request_loop(&self.server, &self.root, self.reload_port);
        Ok(())
    }

    /// Start the request loop on a background thread.
    pub fn run_background(self) -> JoinHandle<()> {
        std::thread::spawn(move || {
            run_request_loop(&self.server, &self.root, self.reload_port);
        })
    }
}

fn run_request_loop(server: &Server, root: &Path, reload_port: Option<u16>) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, root, reload_port) {
            log!("serve"; "request error: {e}");
        }
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, root: &Path, reload_port: Option<u16>) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    // Serve reload.js from memory (doesn't depend on file system)
    if let Some(port) = reload_port
        && request.url() == crate::embed::RELOAD_JS_PATH
    {
        return response::respond_reload_js(request, port);
    }

    if let Some(path) = resolve_path(request.url(), root) {
        return response::respond_file(request, &path, reload_port);
    }

    response::respond_not_found(request)
}

/// Resolve a request URL to a file under `root`.
///
/// Rejects traversal components; directories resolve to their
/// `index.html`. Returns `None` when nothing servable exists.
fn resolve_path(url: &str, root: &Path) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let relative = Path::new(path.trim_start_matches('/'));

    // No escaping the theme root
    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return None;
    }

    let mut candidate = root.join(relative);
    if candidate.is_dir() {
        candidate = candidate.join("index.html");
    }
    candidate.is_file().then_some(candidate)
}
