//! HTTP response handlers.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::utils::mime;

/// Respond with a static file, injecting the reload script into HTML.
pub fn respond_file(request: Request, path: &Path, reload_port: Option<u16>) -> Result<()> {
    let content_type = mime::from_path(path);

    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let body = maybe_inject_reload(body, content_type, reload_port);

    send_body(request, 200, content_type, body)
}

/// Respond with 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, mime::types::PLAIN, b"404 Not Found".to_vec())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(
        request,
        503,
        mime::types::PLAIN,
        b"503 Service Unavailable".to_vec(),
    )
}

/// Respond with reload.js from memory.
pub fn respond_reload_js(request: Request, ws_port: u16) -> Result<()> {
    let body = crate::embed::reload_js(ws_port);
    send_body(request, 200, mime::types::JAVASCRIPT, body.into_bytes())
}

/// Inject the reload script tag into HTML bodies when reload is active.
fn maybe_inject_reload(body: Vec<u8>, content_type: &str, reload_port: Option<u16>) -> Vec<u8> {
    if reload_port.is_none() || !mime::is_html(content_type) {
        return body;
    }

    let html = match String::from_utf8(body) {
        Ok(html) => html,
        // Mislabeled binary; serve untouched
        Err(e) => return e.into_bytes(),
    };

    let tag = crate::embed::reload_script_tag();
    let injected = if html.contains("</body>") {
        html.replacen("</body>", &format!("{tag}</body>"), 1)
    } else {
        format!("{html}{tag}")
    };
    injected.into_bytes()
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
