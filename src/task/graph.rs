//! Task graph definition and validation.

use rustc_hash::FxHashSet;

use super::TaskError;

/// A task's work, run against the shared context `C`.
pub type TaskAction<C> = Box<dyn Fn(&mut C) -> anyhow::Result<()>>;

/// A named task: ordered prerequisites plus an action.
pub(super) struct TaskDef<C> {
    pub(super) name: String,
    pub(super) deps: Vec<String>,
    pub(super) action: TaskAction<C>,
}

/// Directed acyclic graph of tasks.
///
/// Built with [`TaskGraph::task`]; checked by [`TaskGraph::validate`]:
/// task names must be unique, prerequisites must reference tasks that
/// exist, and the dependency relation must be acyclic.
pub struct TaskGraph<C> {
    pub(super) tasks: Vec<TaskDef<C>>,
}

impl<C> Default for TaskGraph<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TaskGraph<C> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a task. Duplicates are reported by [`TaskGraph::validate`].
    pub fn task(
        mut self,
        name: &str,
        deps: &[&str],
        action: impl Fn(&mut C) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.tasks.push(TaskDef {
            name: name.to_string(),
            deps: deps.iter().map(|d| (*d).to_string()).collect(),
            action: Box::new(action),
        });
        self
    }

    pub(super) fn get(&self, name: &str) -> Option<&TaskDef<C>> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Check graph invariants: unique names, resolvable prerequisites,
    /// no cycles.
    pub fn validate(&self) -> Result<(), TaskError> {
        let mut seen = FxHashSet::default();
        for task in &self.tasks {
            if !seen.insert(task.name.as_str()) {
                return Err(TaskError::Duplicate(task.name.clone()));
            }
        }

        for task in &self.tasks {
            for dep in &task.deps {
                if self.get(dep).is_none() {
                    return Err(TaskError::UnknownDependency {
                        task: task.name.clone(),
                        dep: dep.clone(),
                    });
                }
            }
        }

        // Cycle check from every node (the graph may be disconnected)
        for task in &self.tasks {
            let mut stack = Vec::new();
            let mut done = FxHashSet::default();
            self.check_cycles(&task.name, &mut stack, &mut done)?;
        }

        Ok(())
    }

    /// DFS cycle detection with an explicit path stack for error reporting.
    fn check_cycles(
        &self,
        name: &str,
        stack: &mut Vec<String>,
        done: &mut FxHashSet<String>,
    ) -> Result<(), TaskError> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|n| n == name) {
            let mut cycle: Vec<String> = stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(TaskError::Cycle(cycle));
        }

        stack.push(name.to_string());
        if let Some(task) = self.get(name) {
            for dep in &task.deps {
                self.check_cycles(dep, stack, done)?;
            }
        }
        stack.pop();
        done.insert(name.to_string());
        Ok(())
    }

    /// Resolve the series execution order for `name`: prerequisites first
    /// (depth-first, in declaration order), each task exactly once, the
    /// requested task last.
    pub fn series(&self, name: &str) -> Result<Vec<String>, TaskError> {
        if self.get(name).is_none() {
            return Err(TaskError::UnknownTask(name.to_string()));
        }

        let mut order = Vec::new();
        let mut visited = FxHashSet::default();
        self.collect_series(name, &mut visited, &mut order)?;
        Ok(order)
    }

    fn collect_series(
        &self,
        name: &str,
        visited: &mut FxHashSet<String>,
        order: &mut Vec<String>,
    ) -> Result<(), TaskError> {
        if !visited.insert(name.to_string()) {
            return Ok(());
        }

        let task = self
            .get(name)
            .ok_or_else(|| TaskError::UnknownTask(name.to_string()))?;
        for dep in &task.deps {
            self.collect_series(dep, visited, order)?;
        }
        order.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> impl Fn(&mut ()) -> anyhow::Result<()> {
        |_| Ok(())
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let graph = TaskGraph::new()
            .task("css", &[], noop())
            .task("css", &[], noop());
        assert!(matches!(graph.validate(), Err(TaskError::Duplicate(name)) if name == "css"));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let graph = TaskGraph::new().task("build", &["css"], noop());
        let err = graph.validate().unwrap_err();
        assert!(matches!(
            err,
            TaskError::UnknownDependency { ref task, ref dep } if task == "build" && dep == "css"
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let graph = TaskGraph::new()
            .task("a", &["b"], noop())
            .task("b", &["c"], noop())
            .task("c", &["a"], noop());
        let err = graph.validate().unwrap_err();
        match err {
            TaskError::Cycle(path) => {
                assert!(path.len() >= 3);
                assert_eq!(path.first(), path.last());
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_graph() {
        let graph = TaskGraph::new()
            .task("css", &[], noop())
            .task("build", &["css"], noop())
            .task("zip", &["css"], noop());
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_series_order() {
        let graph = TaskGraph::new()
            .task("css", &[], noop())
            .task("build", &["css"], noop())
            .task("default", &["build"], noop());

        let order = graph.series("default").unwrap();
        assert_eq!(order, vec!["css", "build", "default"]);
    }

    #[test]
    fn test_series_runs_shared_dependency_once() {
        // Diamond: both paths reach `css`, which must appear once
        let graph = TaskGraph::new()
            .task("css", &[], noop())
            .task("build", &["css"], noop())
            .task("zip", &["css"], noop())
            .task("all", &["build", "zip"], noop());

        let order = graph.series("all").unwrap();
        assert_eq!(order, vec!["css", "build", "zip", "all"]);
        assert_eq!(order.iter().filter(|n| *n == "css").count(), 1);
    }

    #[test]
    fn test_series_unknown_task() {
        let graph = TaskGraph::<()>::new().task("css", &[], noop());
        assert!(matches!(
            graph.series("deploy"),
            Err(TaskError::UnknownTask(name)) if name == "deploy"
        ));
    }
}
