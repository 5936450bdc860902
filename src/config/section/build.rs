//! `[build]` section configuration.
//!
//! CSS source/output locations and transform settings.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "assets/css"       # Top-level *.css files are built
//! output = "assets/built"     # Transformed CSS + source maps land here
//! minify = true
//! targets = ["defaults"]      # browserslist queries for lowering/prefixing
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigDiagnostics;

/// CSS build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory containing the CSS entry files (top-level `*.css`).
    pub source: PathBuf,

    /// Directory the transformed CSS and source maps are written to.
    pub output: PathBuf,

    /// Minify the emitted CSS.
    pub minify: bool,

    /// browserslist queries deciding which custom properties, color
    /// functions and vendor prefixes get lowered.
    pub targets: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("assets/css"),
            output: PathBuf::from("assets/built"),
            minify: true,
            targets: vec!["defaults".into()],
        }
    }
}

impl BuildConfig {
    /// Validate build configuration.
    ///
    /// Paths must stay relative in the config file; they are resolved
    /// against the project root after loading.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        if self.source.is_absolute() {
            diag.error(
                "build.source",
                format!("must be relative to the project root: {}", self.source.display()),
            );
        }
        if self.output.is_absolute() {
            diag.error(
                "build.output",
                format!("must be relative to the project root: {}", self.output.display()),
            );
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.targets.is_empty() {
            diag.error_with_hint(
                "build.targets",
                "at least one browserslist query is required",
                "use [\"defaults\"] unless the theme pins browser support",
            );
        }
    }
}
