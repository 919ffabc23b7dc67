use std::slice;

use crate::domain::graph::Graph;
use crate::domain::task::{Task, TaskKind};
use crate::error::{Error, Result};

/// Pre-order walk over every task of a graph tree.
///
/// Each `TaskGraphTask` is yielded before the contents of its subgraph.
pub struct AllTasks<'a> {
    stack: Vec<slice::Iter<'a, Task>>,
}

impl<'a> Iterator for AllTasks<'a> {
    type Item = &'a Task;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(task) => {
                    if let TaskKind::Graph(graph_task) = &task.kind {
                        self.stack.push(graph_task.subgraph.tasks.iter());
                    }
                    return Some(task);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl Graph {
    pub fn all_tasks(&self) -> AllTasks<'_> {
        AllTasks {
            stack: vec![self.tasks.iter()],
        }
    }

    /// Looks up a task anywhere in the tree. Ids are expected to resolve, so
    /// a miss is reported as an error rather than an empty result.
    pub fn get_task(&self, task_id: &str) -> Result<&Task> {
        self.all_tasks()
            .find(|task| task.task_id == task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.all_tasks().any(|task| task.task_id == task_id)
    }

    pub(crate) fn get_task_mut(&mut self, task_id: &str) -> Result<&mut Task> {
        find_task_mut(&mut self.tasks, task_id).ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    /// Resolved positional deps, named deps and creator of a task, in that order.
    pub fn get_dependencies(&self, task_id: &str) -> Result<Vec<&Task>> {
        let task = self.get_task(task_id)?;
        task.dependency_ids().map(|dep_id| self.get_task(dep_id)).collect()
    }

    /// The `TaskGraphTask` whose subgraph directly contains `task_id`, or
    /// `None` for root-level tasks.
    pub fn get_parent_task(&self, task_id: &str) -> Option<&Task> {
        self.all_tasks().find(|candidate| {
            candidate
                .subgraph()
                .is_some_and(|subgraph| subgraph.tasks.iter().any(|task| task.task_id == task_id))
        })
    }

    /// Removes a task from whichever graph directly contains it, falling back
    /// to the root. A graph whose `output_task` was the removed task loses
    /// its output task.
    pub(crate) fn delete_task(&mut self, task_id: &str) {
        if let Some(owner) = find_owner_mut(&mut self.tasks, task_id) {
            owner.remove_direct_task(task_id);
        } else {
            self.remove_direct_task(task_id);
        }
    }

    fn remove_direct_task(&mut self, task_id: &str) {
        self.tasks.retain(|task| task.task_id != task_id);
        if self.output_task.as_deref() == Some(task_id) {
            self.output_task = None;
        }
    }
}

fn find_task_mut<'a>(tasks: &'a mut [Task], task_id: &str) -> Option<&'a mut Task> {
    for task in tasks {
        if task.task_id == task_id {
            return Some(task);
        }
        if let Some(subgraph) = task.subgraph_mut() {
            if let Some(found) = find_task_mut(&mut subgraph.tasks, task_id) {
                return Some(found);
            }
        }
    }
    None
}

/// Finds the subgraph (never the root) that directly contains `task_id`.
fn find_owner_mut<'a>(tasks: &'a mut [Task], task_id: &str) -> Option<&'a mut Graph> {
    for task in tasks {
        if let Some(subgraph) = task.subgraph_mut() {
            if subgraph.tasks.iter().any(|child| child.task_id == task_id) {
                return Some(subgraph);
            }
            if let Some(found) = find_owner_mut(&mut subgraph.tasks, task_id) {
                return Some(found);
            }
        }
    }
    None
}
