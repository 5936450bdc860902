//! `[package]` section configuration.
//!
//! Settings for the `zip` task that archives the theme for distribution.
//!
//! # Example
//!
//! ```toml
//! [package]
//! dist = "dist"                   # Archive is written to dist/<name>.zip
//! exclude = ["node_modules"]      # Top-level directories left out of the archive
//! ```
//!
//! The dist directory itself is always excluded, whatever it is named.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigDiagnostics;

/// Theme packaging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Directory the distribution archive is written to.
    pub dist: PathBuf,

    /// Top-level directory names excluded from the archive.
    pub exclude: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            dist: PathBuf::from("dist"),
            exclude: vec!["node_modules".into()],
        }
    }
}

impl PackageConfig {
    /// All top-level names to skip while archiving: the configured
    /// excludes plus the dist directory itself.
    pub fn excluded_roots(&self) -> Vec<String> {
        let mut roots = self.exclude.clone();
        if let Some(dist) = self.dist.file_name().map(|n| n.to_string_lossy().into_owned())
            && !roots.contains(&dist)
        {
            roots.push(dist);
        }
        roots
    }

    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        if self.dist.is_absolute() {
            diag.error(
                "package.dist",
                format!("must be relative to the project root: {}", self.dist.display()),
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
        assert_eq!(config.package.dist, PathBuf::from("dist"));
        assert_eq!(config.package.exclude, vec!["node_modules"]);
    }

    #[test]
    fn test_excluded_roots_contains_dist() {
        let package = PackageConfig::default();
        let roots = package.excluded_roots();
        assert!(roots.contains(&"node_modules".to_string()));
        assert!(roots.contains(&"dist".to_string()));
    }

    #[test]
    fn test_excluded_roots_no_duplicate_dist() {
        let package = PackageConfig {
            dist: PathBuf::from("out"),
            exclude: vec!["out".into(), "node_modules".into()],
        };
        let roots = package.excluded_roots();
        assert_eq!(roots.iter().filter(|r| *r == "out").count(), 1);
    }

    #[test]
    fn test_custom_excludes() {
        let config = test_parse_config("[package]\nexclude = [\"vendor\", \"tmp\"]");
        assert_eq!(config.package.exclude, vec!["vendor", "tmp"]);
    }
}
