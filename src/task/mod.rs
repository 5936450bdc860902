//! Task graph: named units of work with ordering dependencies.
//!
//! The graph is an explicit value handed to the executor, not a
//! process-global registry: ordering and failure behavior are testable
//! without running real tasks. Prerequisites run in series (depth-first),
//! each task at most once per invocation.

mod graph;
mod runner;

pub use graph::TaskGraph;
pub use runner::{TaskEvent, TaskRun};

use thiserror::Error;

/// Task graph and execution errors.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("duplicate task `{0}`")]
    Duplicate(String),

    #[error("task `{task}` depends on unknown task `{dep}`")]
    UnknownDependency { task: String, dep: String },

    #[error("dependency cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("unknown task `{0}`")]
    UnknownTask(String),

    #[error("task `{task}` failed")]
    Failed {
        task: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
