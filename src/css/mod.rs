//! CSS build pipeline.
//!
//! Every top-level `*.css` file in the source directory runs through a
//! fixed transform chain: `@import` bundling, targeted lowering of custom
//! properties / color functions / vendor prefixes, then minification.
//! Each file's result is a value — `BuiltFile` or `CssError` — so the
//! caller decides whether a failure is fatal (one-shot build) or contained
//! (watch loop).

mod pipeline;

pub use pipeline::{BuiltFile, CssOptions, build_dir, build_file, parse_targets};

use std::path::PathBuf;
use thiserror::Error;

/// Per-file CSS pipeline errors.
#[derive(Debug, Error)]
pub enum CssError {
    #[error("invalid browser targets `{query}`: {message}")]
    Targets { query: String, message: String },

    #[error("failed to parse {}: {}", .path.display(), .message)]
    Parse { path: PathBuf, message: String },

    #[error("failed to transform {}: {}", .path.display(), .message)]
    Transform { path: PathBuf, message: String },

    #[error("failed to print {}: {}", .path.display(), .message)]
    Print { path: PathBuf, message: String },

    #[error("failed to generate source map for {}: {}", .path.display(), .message)]
    SourceMap { path: PathBuf, message: String },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
