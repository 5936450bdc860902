//! `[purge]` section configuration.
//!
//! Declares which template/content files the external utility-CSS tool
//! scans when dropping unused classes, plus the plugins it loads. patina
//! only compiles this section into the tool's command line; the usage
//! analysis itself happens in the external tool.
//!
//! # Example
//!
//! ```toml
//! [purge]
//! enable = true
//! input = "assets/css/framework.css"
//! command = ["tailwindcss"]
//! content = ["_layouts/**/*.html", "*.md"]
//! plugins = ["typography"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigDiagnostics;

/// Unused-style purge settings (compiled to an external tool invocation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Enable the purge step.
    pub enable: bool,

    /// Stylesheet handed to the external tool (`-i`).
    pub input: Option<PathBuf>,

    /// External tool command (e.g., `["tailwindcss"]` or `["npx", "tailwindcss"]`).
    pub command: Vec<String>,

    /// Content globs scanned for class usage, in order.
    pub content: Vec<String>,

    /// Plugins registered with the external tool.
    pub plugins: Vec<String>,

    /// Suppress the external tool's output (default: true).
    pub quiet: bool,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            enable: false,
            input: None,
            command: vec!["tailwindcss".into()],
            content: vec![
                "_includes/**/*.html".into(),
                "_layouts/**/*.html".into(),
                "_posts/*.md".into(),
                "*.html".into(),
                "*.md".into(),
                "course/*.md".into(),
                "course/**/*.md".into(),
                "assets/built/*.css".into(),
            ],
            plugins: vec!["typography".into()],
            quiet: true,
        }
    }
}

impl PurgeConfig {
    /// Validate purge configuration.
    ///
    /// # Checks
    /// - If enabled:
    ///   - `command` must not be empty
    ///   - `command[0]` must be an installed executable (or package runner)
    ///   - `input` must be configured and point to an existing file
    ///   - `content` must not be empty
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }

        // Command must have at least one element
        if self.command.is_empty() {
            diag.error("purge.command", "purge.enable is true but purge.command is empty");
            return;
        }

        // Check if command is installed
        let cmd = &self.command[0];
        let is_package_runner = ["npx", "bunx", "pnpx", "yarn", "dlx"].contains(&cmd.as_str());

        if which::which(cmd).is_err() {
            if is_package_runner {
                // Package runners can download packages at runtime, just hint
                if self.command.len() > 1 {
                    diag.hint(
                        "purge.command",
                        format!(
                            "`{}` via `{}` — ensure package is installed",
                            self.command[1], cmd
                        ),
                    );
                }
            } else {
                diag.error_with_hint(
                    "purge.command",
                    format!("`{cmd}` not found"),
                    "install the command or update purge.command",
                );
            }
        }

        if self.content.is_empty() {
            diag.error(
                "purge.content",
                "purge.enable is true but no content globs are configured",
            );
        }

        // Input must be configured
        let Some(input) = &self.input else {
            diag.error("purge.input", "purge.enable is true but purge.input is not configured");
            return;
        };

        // Input must exist and be a file
        if !input.exists() {
            diag.error(
                "purge.input",
                format!("purge.input file not found: {}", input.display()),
            );
        } else if !input.is_file() {
            diag.error(
                "purge.input",
                format!("purge.input is not a file: {}", input.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(!config.purge.enable);
        assert!(config.purge.input.is_none());
        assert_eq!(config.purge.command, vec!["tailwindcss"]);
        assert_eq!(config.purge.plugins, vec!["typography"]);
        assert_eq!(config.purge.content.len(), 8);
        assert_eq!(config.purge.content[0], "_includes/**/*.html");
    }

    #[test]
    fn test_purge_config() {
        let config = test_parse_config(
            r#"
[purge]
enable = true
input = "assets/css/framework.css"
command = ["npx", "tailwindcss"]
content = ["*.html"]
"#,
        );
        assert!(config.purge.enable);
        assert_eq!(
            config.purge.input,
            Some(PathBuf::from("assets/css/framework.css"))
        );
        assert_eq!(config.purge.command, vec!["npx", "tailwindcss"]);
        assert_eq!(config.purge.content, vec!["*.html"]);
    }

    #[test]
    fn test_disabled_purge_skips_validation() {
        let purge = PurgeConfig::default();
        let mut diag = ConfigDiagnostics::new();
        purge.validate(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_enabled_purge_requires_input() {
        let purge = PurgeConfig {
            enable: true,
            // Use a command that always exists so the check focuses on input
            command: vec!["sh".into()],
            ..PurgeConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        purge.validate(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors().iter().any(|e| e.field == "purge.input"));
    }

    #[test]
    fn test_enabled_purge_requires_command() {
        let purge = PurgeConfig {
            enable: true,
            command: Vec::new(),
            ..PurgeConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        purge.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field == "purge.command"));
    }
}
