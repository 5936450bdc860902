//! patina - asset pipeline for static-site themes.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod css;
mod embed;
mod logger;
mod package;
mod purge;
mod reload;
mod serve;
mod task;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, tasks};
use config::PatinaConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PatinaConfig::load(&cli)?;

    let graph = tasks::graph();
    let mut ctx = tasks::TaskContext::new(config);
    graph.run(cli.task_name(), &mut ctx)?;

    // `build` leaves the bound preview server for the foreground loop;
    // `default` already moved it to a background thread before watching
    if let Some(preview) = ctx.preview.take() {
        preview.run()?;
    }

    Ok(())
}
