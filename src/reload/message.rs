//! Live Reload Message Protocol
//!
//! Defines the JSON message format for WebSocket communication between
//! the build tool and browser clients.
//!
//! # Message Types
//!
//! - `reload`: Trigger full page reload
//! - `css`: Swap an updated stylesheet (no full reload)
//! - `connected`: Handshake confirmation

use serde::{Deserialize, Serialize};

/// Live reload message sent over WebSocket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Full page reload
    Reload {
        /// Optional reason for reload
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Stylesheet update (fast path - the client swaps the link href)
    Css {
        /// Served stylesheet path (e.g., "/assets/built/screen.css")
        href: String,
    },

    /// Connection established
    Connected {
        /// Tool version for compatibility check
        version: String,
    },
}

impl ReloadMessage {
    /// Create a reload message
    pub fn reload() -> Self {
        Self::Reload { reason: None }
    }

    /// Create a reload message with reason
    pub fn reload_with_reason(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    /// Create a stylesheet update message
    pub fn css(href: impl Into<String>) -> Self {
        Self::Css { href: href.into() }
    }

    /// Create a connected message
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }

    /// Parse from JSON string
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_message_serialization() {
        let msg = ReloadMessage::css("/assets/built/screen.css");
        let json = msg.to_json();
        assert!(json.contains(r#""type":"css""#));
        assert!(json.contains(r#""href":"/assets/built/screen.css""#));

        let parsed = ReloadMessage::from_json(&json).unwrap();
        match parsed {
            ReloadMessage::Css { href } => assert_eq!(href, "/assets/built/screen.css"),
            _ => panic!("Expected Css message"),
        }
    }

    #[test]
    fn test_reload_message() {
        let msg = ReloadMessage::reload_with_reason("stylesheet rebuilt");
        let json = msg.to_json();
        assert!(json.contains(r#""type":"reload""#));
        assert!(json.contains(r#""reason":"stylesheet rebuilt""#));
    }

    #[test]
    fn test_reload_without_reason_omits_field() {
        let json = ReloadMessage::reload().to_json();
        assert!(!json.contains("reason"));
    }

    #[test]
    fn test_connected_carries_version() {
        let json = ReloadMessage::connected().to_json();
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }
}
