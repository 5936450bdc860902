//! Command-line argument definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// patina theme asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: patina.toml)
    #[arg(short = 'C', long, default_value = "patina.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Task to run (defaults to `build` followed by watching)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available tasks
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build theme CSS once
    #[command(visible_alias = "c")]
    Css {
        /// Minify the emitted CSS
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Build CSS, then start the preview server with live reload
    #[command(visible_alias = "b")]
    Build {
        /// Minify the emitted CSS
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,

        /// Port number for the HTTP preview server
        #[arg(short, long)]
        port: Option<u16>,

        /// Port number for the live-reload listener
        #[arg(short = 'r', long)]
        reload_port: Option<u16>,

        /// Enable file watching for auto-rebuild
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Watch CSS sources and rebuild on change
    #[command(visible_alias = "w")]
    Watch {},

    /// Package the theme into dist/<name>.zip
    #[command(visible_alias = "z")]
    Zip {},
}

impl Cli {
    /// Name of the task graph entry the invocation maps to.
    ///
    /// No subcommand runs `default` (build + watch), matching the task
    /// runner convention.
    pub const fn task_name(&self) -> &'static str {
        match self.command {
            Some(Commands::Css { .. }) => "css",
            Some(Commands::Build { .. }) => "build",
            Some(Commands::Watch {}) => "watch",
            Some(Commands::Zip {}) => "zip",
            None => "default",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_default() {
        let cli = Cli::parse_from(["patina"]);
        assert_eq!(cli.task_name(), "default");
    }

    #[test]
    fn test_subcommands_map_to_tasks() {
        assert_eq!(Cli::parse_from(["patina", "css"]).task_name(), "css");
        assert_eq!(Cli::parse_from(["patina", "build"]).task_name(), "build");
        assert_eq!(Cli::parse_from(["patina", "watch"]).task_name(), "watch");
        assert_eq!(Cli::parse_from(["patina", "zip"]).task_name(), "zip");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Cli::parse_from(["patina", "b"]).task_name(), "build");
        assert_eq!(Cli::parse_from(["patina", "z"]).task_name(), "zip");
    }

    #[test]
    fn test_minify_flag_forms() {
        let cli = Cli::parse_from(["patina", "css", "--minify", "false"]);
        match cli.command {
            Some(Commands::Css { minify }) => assert_eq!(minify, Some(false)),
            _ => panic!("expected css command"),
        }

        let cli = Cli::parse_from(["patina", "css", "--minify"]);
        match cli.command {
            Some(Commands::Css { minify }) => assert_eq!(minify, Some(true)),
            _ => panic!("expected css command"),
        }
    }
}
