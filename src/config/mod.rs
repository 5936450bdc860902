//! Project configuration management for `patina.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── theme      # [theme]
//! │   ├── build      # [build]
//! │   ├── serve      # [serve]
//! │   ├── package    # [package]
//! │   └── purge      # [purge]
//! ├── diagnostics    # ConfigError + collected validation diagnostics
//! └── mod.rs         # PatinaConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[theme]`   | Theme metadata (name feeds the archive filename) |
//! | `[build]`   | CSS source/output dirs, minify, targets          |
//! | `[serve]`   | Preview server and live-reload ports, watch      |
//! | `[package]` | Distribution directory and archive excludes      |
//! | `[purge]`   | Content globs + plugins for the purge tool       |

mod diagnostics;
pub mod section;

pub use diagnostics::{ConfigDiagnostics, ConfigError, FieldPath};
pub use section::{BuildConfig, PackageConfig, PurgeConfig, ServeConfig, ThemeInfoConfig};

use crate::cli::{Cli, Commands};
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing patina.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatinaConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Theme metadata
    #[serde(default)]
    pub theme: ThemeInfoConfig,

    /// CSS build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Packaging settings
    #[serde(default)]
    pub package: PackageConfig,

    /// Purge settings
    #[serde(default)]
    pub purge: PurgeConfig,
}

impl Default for PatinaConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            theme: ThemeInfoConfig::default(),
            build: BuildConfig::default(),
            serve: ServeConfig::default(),
            package: PackageConfig::default(),
            purge: PurgeConfig::default(),
        }
    }
}

impl PatinaConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            log!(
                "error";
                "Config file '{}' not found. patina runs from a theme directory containing one.",
                cli.config.display()
            );
            std::process::exit(1);
        };

        let mut config = Self::from_path(&config_path)?;

        // Validate raw paths before normalization
        config.validate_paths()?;

        config.config_path = config_path;
        config.finalize(cli);
        config.validate(cli)?;

        Ok(config)
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let root = normalize_path(&root);

        self.config_path = normalize_path(&self.config_path);
        self.apply_command_options(cli);

        // Resolve config-relative paths against the project root
        self.build.source = root.join(&self.build.source);
        self.build.output = root.join(&self.build.output);
        self.package.dist = root.join(&self.package.dist);
        if let Some(input) = self.purge.input.take() {
            self.purge.input = Some(root.join(input));
        }

        self.root = root;
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
            if !Self::prompt_continue()? {
                bail!("Aborted due to unknown config fields");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        // Show only filename (patina.toml) since it's always at the theme root
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Prompt user to continue. Returns true only if user explicitly confirms.
    fn prompt_continue() -> Result<bool> {
        use std::io::{self, Write};

        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let input = input.trim().to_lowercase();
        // Default no (empty input), explicit "y" or "yes" to continue
        Ok(input == "y" || input == "yes")
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the theme root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Some(Commands::Css { minify }) => {
                Self::update_option(&mut self.build.minify, minify.as_ref());
            }
            Some(Commands::Build {
                minify,
                port,
                reload_port,
                watch,
            }) => {
                Self::update_option(&mut self.build.minify, minify.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.reload_port, reload_port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
            }
            // Watch and Zip take their settings from the config file
            Some(Commands::Watch {}) | Some(Commands::Zip {}) | None => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before normalization.
    ///
    /// This must be called before `finalize()` because path resolution
    /// converts relative paths to absolute paths, making it impossible to
    /// detect if the user specified an absolute path in the config.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate_paths(&mut diag);
        self.package.validate_paths(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, cli: &Cli) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.purge.validate(&mut diag);

        // The archive name comes from theme.name, so only zip needs it
        if matches!(cli.command, Some(Commands::Zip {})) {
            self.theme.validate(&mut diag);
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir()
        .context("Failed to get current working directory")
        .ok()?;

    // First check if config_name is an absolute path
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    // Walk up from cwd looking for config file
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with the minimal required `[theme]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> PatinaConfig {
    let config = format!("[theme]\nname = \"demo\"\n{extra}");
    let (parsed, ignored) = PatinaConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
