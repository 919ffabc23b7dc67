use std::collections::HashSet;

use serde_json::Value;

use crate::domain::edit::EditField;
use crate::domain::graph::Graph;
use crate::domain::state::TaskState;
use crate::domain::task::Task;
use crate::error::{Error, Result};

impl Graph {
    /// Applies a hand edit and returns the resulting consistent snapshot.
    ///
    /// `task_id == None` edits the root graph itself. The edit is checked
    /// against the task type before anything is touched, and all changes are
    /// made on a copy, so `self` is unchanged whether the edit is accepted or
    /// rejected.
    pub fn on_edit(&self, task_id: Option<&str>, field_name: &str, new_value: Value) -> Result<Graph> {
        let task_type = task_id.map(|task_id| self.get_task(task_id).map(Task::task_type)).transpose()?;
        let field = EditField::parse(task_type, field_name)?;

        let mut next = self.copy();
        match task_id {
            None => next.apply_graph_edit(field, new_value),
            Some(task_id) => {
                next.get_task_mut(task_id)?.apply_edit(field, new_value)?;
                next.on_task_updated(task_id)?;
            }
        }

        log::info!("Edit accepted: {} of '{}'.", field.as_str(), task_id.unwrap_or("graph"));

        Ok(next)
    }

    /// Clears the computed fields of one task and cascades, returning the
    /// resulting snapshot.
    pub fn invalidate_task(&self, task_id: &str) -> Result<Graph> {
        let mut next = self.copy();
        next.get_task_mut(task_id)?.invalidate();
        next.on_task_updated(task_id)?;

        Ok(next)
    }

    /// Cascades a change of `task_id` through the whole tree. Returns whether
    /// the root graph's output task was invalidated.
    pub fn on_task_updated(&mut self, task_id: &str) -> Result<bool> {
        self.on_task_updated_in_subgraph(task_id, &mut Vec::new())
    }

    /// Scans the graph at `path` in declaration order, invalidating every task
    /// that depends on something updated and recursing into subgraphs that may
    /// contain `task_id`. Tasks created by an updated task that is no longer
    /// complete, or that is itself being deleted, are deleted once the scan
    /// is over.
    ///
    /// Returns whether the scanned graph's output task was updated.
    fn on_task_updated_in_subgraph(&mut self, task_id: &str, path: &mut Vec<usize>) -> Result<bool> {
        let mut updated: HashSet<String> = HashSet::from([task_id.to_string()]);
        let mut to_delete: Vec<String> = Vec::new();

        let task_count = self.subgraph_at(path)?.tasks.len();
        for index in 0..task_count {
            let task = &self.subgraph_at(path)?.tasks[index];
            let current_id = task.task_id.clone();
            let deps_updated = task.declared_deps().any(|dep| updated.contains(dep));
            let has_subgraph = task.subgraph().is_some();
            let created_by = task.created_by.clone();

            if deps_updated {
                log::debug!("Invalidating '{}'.", current_id);
                self.task_at_mut(path, index)?.invalidate();
                updated.insert(current_id.clone());
            } else if has_subgraph {
                path.push(index);
                let subgraph_updated = self.on_task_updated_in_subgraph(task_id, path);
                path.pop();

                if subgraph_updated? {
                    log::debug!("Output of subgraph '{}' invalidated.", current_id);
                    self.task_at_mut(path, index)?.output_data = None;
                    updated.insert(current_id.clone());
                }
            }

            // A creator already slated for deletion takes its own creations with it.
            if let Some(creator) = created_by {
                let creator_gone = to_delete.contains(&creator);
                if updated.contains(&creator) && (creator_gone || self.get_task_state(&creator)? != TaskState::Complete) {
                    updated.insert(current_id.clone());
                    to_delete.push(current_id);
                }
            }
        }

        let output_updated = self
            .subgraph_at(path)?
            .output_task
            .as_ref()
            .is_some_and(|output_task| updated.contains(output_task));

        for doomed in &to_delete {
            log::warn!("Deleting '{}': its creator was invalidated.", doomed);
            self.delete_task(doomed);
        }

        Ok(output_updated)
    }

    fn subgraph_at(&self, path: &[usize]) -> Result<&Graph> {
        let mut graph = self;
        for &index in path {
            graph = graph.tasks.get(index).and_then(Task::subgraph).ok_or_else(|| missing_subgraph(path))?;
        }
        Ok(graph)
    }

    fn task_at_mut(&mut self, path: &[usize], index: usize) -> Result<&mut Task> {
        let mut graph = self;
        for &step in path {
            graph = graph.tasks.get_mut(step).and_then(Task::subgraph_mut).ok_or_else(|| missing_subgraph(path))?;
        }
        graph.tasks.get_mut(index).ok_or_else(|| missing_subgraph(path))
    }
}

fn missing_subgraph(path: &[usize]) -> Error {
    Error::TaskNotFound(format!("subgraph at position {:?}", path))
}
