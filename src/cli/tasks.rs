//! The task graph wiring: `css`, `build`, `watch`, `zip`, `default`.
//!
//! `default` → `build` → `css`; `build` binds the preview server and the
//! reload listener after CSS is built; `default` then enters the watch
//! loop. `zip` → `css` packages a fresh build.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::config::PatinaConfig;
use crate::css::{self, BuiltFile, CssError};
use crate::reload::{ReloadHandle, ReloadMessage};
use crate::serve::BoundServer;
use crate::task::TaskGraph;
use crate::utils::path::to_slash_string;
use crate::watch::{ChangeKind, DEBOUNCE, Debouncer};
use crate::{log, logger, package, purge, reload, serve, watch};

/// Shared state threaded through one task graph invocation.
pub struct TaskContext {
    pub config: PatinaConfig,
    /// Reload client registry, present once `build` has started the listener.
    pub reload: Option<ReloadHandle>,
    /// Bound preview server; `build` leaves it for the caller to run,
    /// `default` moves it to a background thread before watching.
    pub preview: Option<BoundServer>,
}

impl TaskContext {
    pub fn new(config: PatinaConfig) -> Self {
        Self {
            config,
            reload: None,
            preview: None,
        }
    }
}

/// The patina task graph.
pub fn graph() -> TaskGraph<TaskContext> {
    TaskGraph::new()
        .task("css", &[], run_css)
        .task("build", &["css"], run_build)
        .task("watch", &[], run_watch)
        .task("zip", &["css"], run_zip)
        .task("default", &["build"], run_default)
}

// ============================================================================
// task actions
// ============================================================================

/// `css`: build every stylesheet, then the purge step.
///
/// Per-file transform failures are logged (with the bell) and swallowed;
/// the task itself only fails on environment errors (missing source dir,
/// unwritable output, failing purge tool).
fn run_css(ctx: &mut TaskContext) -> Result<()> {
    let started = Instant::now();
    let outcomes = css::build_dir(&ctx.config)?;

    let mut built = 0;
    for outcome in &outcomes {
        match outcome {
            Ok(file) => {
                built += 1;
                crate::debug!(
                    "css";
                    "{} ({} bytes)",
                    ctx.config.root_relative(&file.css).display(),
                    file.bytes
                );
            }
            Err(err) => {
                log!("css"; "{}", err);
                logger::bell();
            }
        }
    }

    purge::run(&ctx.config)?;

    log!(
        "css";
        "built {}/{} stylesheets in {:?}",
        built,
        outcomes.len(),
        started.elapsed()
    );

    notify_clients(ctx.reload.as_ref(), &ctx.config, &outcomes);
    Ok(())
}

/// `build`: start the reload listener and bind the preview server.
///
/// Non-blocking: the caller decides where the request loop runs, so
/// `default` can keep the foreground for its watch loop.
fn run_build(ctx: &mut TaskContext) -> Result<()> {
    if ctx.config.serve.watch {
        ctx.reload = Some(reload::start(ctx.config.serve.reload_port)?);
    }

    let reload_port = ctx.reload.as_ref().map(ReloadHandle::port);
    ctx.preview = Some(serve::bind(&ctx.config, reload_port)?);
    Ok(())
}

/// `watch`: rebuild CSS whenever a source file changes, until Ctrl+C.
fn run_watch(ctx: &mut TaskContext) -> Result<()> {
    let source = ctx.config.build.source.clone();
    let subscription = watch::subscribe(&source)?;
    log!(
        "watch";
        "watching {}",
        ctx.config.root_relative(&source).display()
    );

    let cancel = crate::core::subscribe_shutdown();
    let config = &ctx.config;
    let reload = ctx.reload.clone();

    watch::event_loop(
        &subscription.events,
        &cancel,
        Debouncer::new(DEBOUNCE),
        |changes| rebuild(config, reload.as_ref(), &changes),
    );

    Ok(())
}

/// `zip`: package the theme (depends on a fresh CSS build).
fn run_zip(ctx: &mut TaskContext) -> Result<()> {
    package::archive(&ctx.config)?;
    Ok(())
}

/// `default`: move the preview server to the background, then watch.
fn run_default(ctx: &mut TaskContext) -> Result<()> {
    if !ctx.config.serve.watch {
        // Nothing to watch; the preview stays in the foreground
        return Ok(());
    }

    if let Some(preview) = ctx.preview.take() {
        let _ = preview.run_background();
    }
    run_watch(ctx)
}

// ============================================================================
// rebuild (watch mode)
// ============================================================================

/// One watch-triggered rebuild.
///
/// This is the contained error path: a failing transform logs, rings the
/// bell and leaves the loop running. Only the failing file stays stale.
fn rebuild(
    config: &PatinaConfig,
    reload: Option<&ReloadHandle>,
    changes: &FxHashMap<PathBuf, ChangeKind>,
) {
    for (path, kind) in changes {
        crate::debug!("watch"; "{}: {}", kind.label(), config.root_relative(path).display());
    }

    let outcomes = match css::build_dir(config) {
        Ok(outcomes) => outcomes,
        Err(err) => {
            logger::status_error("css build failed", &format!("{err:#}"));
            logger::bell();
            return;
        }
    };

    let mut failed = 0;
    for outcome in &outcomes {
        if let Err(err) = outcome {
            logger::status_error("stylesheet build failed", &err.to_string());
            logger::bell();
            failed += 1;
        }
    }

    if let Err(err) = purge::run(config) {
        logger::status_error("purge failed", &format!("{err:#}"));
        logger::bell();
        return;
    }

    if failed == 0 {
        logger::status_success(&format!("rebuilt {} stylesheet(s)", outcomes.len()));
    }
    notify_clients(reload, config, &outcomes);
}

/// Notify connected reload clients about the stylesheets that built.
fn notify_clients(
    reload: Option<&ReloadHandle>,
    config: &PatinaConfig,
    outcomes: &[Result<BuiltFile, CssError>],
) {
    let Some(reload) = reload else { return };

    for file in outcomes.iter().flatten() {
        let href = format!("/{}", to_slash_string(&config.root_relative(&file.css)));
        reload.broadcast(&ReloadMessage::css(href));
    }
}

// ============================================================================
// tests
// ============================================================================
