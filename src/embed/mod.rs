//! Embedded assets served from memory.

/// Browser-side reload client, served at [`RELOAD_JS_PATH`].
const RELOAD_JS: &str = include_str!("reload.js");

/// URL the preview server exposes the reload client under.
pub const RELOAD_JS_PATH: &str = "/__patina/reload.js";

/// Render the reload client for the given WebSocket port.
pub fn reload_js(ws_port: u16) -> String {
    RELOAD_JS.replace("__PATINA_WS_PORT__", &ws_port.to_string())
}

/// The `<script>` tag injected into served HTML pages.
pub fn reload_script_tag() -> String {
    format!("<script src=\"{RELOAD_JS_PATH}\"></script>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_js_substitutes_port() {
        let js = reload_js(1234);
        assert!(js.contains("1234"));
        assert!(!js.contains("__PATINA_WS_PORT__"));
    }

    #[test]
    fn test_script_tag_points_at_embed_path() {
        assert!(reload_script_tag().contains(RELOAD_JS_PATH));
    }
}
