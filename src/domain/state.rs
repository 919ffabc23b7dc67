use std::fmt;

use crate::domain::graph::Graph;
use crate::error::Result;

/// Execution state of a task, derived from its own fields and its
/// dependencies. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Complete,
    Error,
    Waiting,
    Ready,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Complete => "complete",
            TaskState::Error => "error",
            TaskState::Waiting => "waiting",
            TaskState::Ready => "ready",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Graph {
    /// Derives the state of a task. Precedence: output present, then error,
    /// then missing dependency output, then whether the enclosing graph has
    /// its input.
    pub fn get_task_state(&self, task_id: &str) -> Result<TaskState> {
        let task = self.get_task(task_id)?;

        if task.is_complete() {
            return Ok(TaskState::Complete);
        }
        if task.error.is_some() {
            return Ok(TaskState::Error);
        }

        let dependencies = self.get_dependencies(task_id)?;
        if dependencies.iter().any(|dep| !dep.is_complete()) {
            return Ok(TaskState::Waiting);
        }

        let has_input = match self.get_parent_task(task_id) {
            Some(parent) => parent.graph_input().is_some(),
            None => self.graph_input.is_some(),
        };

        Ok(if has_input { TaskState::Ready } else { TaskState::Waiting })
    }

    /// State of the graph's output task, `None` when no output task is set.
    pub fn graph_state(&self) -> Result<Option<TaskState>> {
        self.output_task.as_deref().map(|output_task| self.get_task_state(output_task)).transpose()
    }
}
