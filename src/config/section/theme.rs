//! `[theme]` section configuration.
//!
//! Theme metadata. The `name` field is the source of the archive filename
//! produced by the `zip` task (`dist/<name>.zip`).
//!
//! # Example
//!
//! ```toml
//! [theme]
//! name = "solstice"
//! version = "1.2.0"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Theme metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeInfoConfig {
    /// Theme name. Used for the distribution archive filename.
    pub name: String,

    /// Theme version string (informational).
    pub version: String,
}

impl ThemeInfoConfig {
    /// Validate theme metadata.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.is_empty() {
            diag.error_with_hint(
                "theme.name",
                "theme name must not be empty",
                "set [theme] name in patina.toml",
            );
        } else if self.name.contains(['/', '\\']) {
            diag.error(
                "theme.name",
                format!("`{}` must not contain path separators", self.name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_theme_section() {
        let config = test_parse_config("version = \"2.0.1\"");
        assert_eq!(config.theme.name, "demo");
        assert_eq!(config.theme.version, "2.0.1");
    }

    #[test]
    fn test_name_with_separator_rejected() {
        use super::ThemeInfoConfig;
        use crate::config::ConfigDiagnostics;

        let theme = ThemeInfoConfig {
            name: "a/b".into(),
            version: String::new(),
        };
        let mut diag = ConfigDiagnostics::new();
        theme.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_empty_name_rejected() {
        use super::ThemeInfoConfig;
        use crate::config::ConfigDiagnostics;

        let mut diag = ConfigDiagnostics::new();
        ThemeInfoConfig::default().validate(&mut diag);
        assert!(diag.has_errors());
    }
}
