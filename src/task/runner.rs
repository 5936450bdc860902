//! Task execution: series order with start/finish instrumentation.

use super::{TaskError, TaskGraph};

/// A task lifecycle event, recorded in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Started(String),
    Finished(String),
}

/// The record of one graph invocation.
#[derive(Debug, Default)]
pub struct TaskRun {
    /// Tasks in the order they executed.
    pub order: Vec<String>,
    /// Interleaved start/finish events.
    pub events: Vec<TaskEvent>,
}

impl TaskRun {
    /// How many times `name` started during this run.
    pub fn started_count(&self, name: &str) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TaskEvent::Started(n) if n == name))
            .count()
    }

    /// True if `earlier` finished before `later` started.
    pub fn finished_before(&self, earlier: &str, later: &str) -> bool {
        let finished = self
            .events
            .iter()
            .position(|e| matches!(e, TaskEvent::Finished(n) if n == earlier));
        let started = self
            .events
            .iter()
            .position(|e| matches!(e, TaskEvent::Started(n) if n == later));
        match (finished, started) {
            (Some(f), Some(s)) => f < s,
            _ => false,
        }
    }
}

impl<C> TaskGraph<C> {
    /// Validate the graph, then run `name` and its prerequisites in
    /// series against `ctx`.
    ///
    /// A failing action aborts the run; later tasks do not start.
    pub fn run(&self, name: &str, ctx: &mut C) -> Result<TaskRun, TaskError> {
        self.validate()?;
        let order = self.series(name)?;

        let mut run = TaskRun::default();
        for task_name in order {
            crate::debug!("task"; "running `{}`", task_name);
            run.events.push(TaskEvent::Started(task_name.clone()));

            let task = self
                .get(&task_name)
                .ok_or_else(|| TaskError::UnknownTask(task_name.clone()))?;
            (task.action)(ctx).map_err(|source| TaskError::Failed {
                task: task_name.clone(),
                source: source.into(),
            })?;

            run.events.push(TaskEvent::Finished(task_name.clone()));
            run.order.push(task_name);
        }

        Ok(run)
    }
}
