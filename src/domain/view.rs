use std::collections::BTreeMap;

use crate::domain::graph::Graph;
use crate::domain::task::TaskType;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// The target consumes the source's output.
    Output,
    /// The source spawned the target while executing.
    Creation,
}

/// Directed edge handed to the layout engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// A task as the layout engine sees it: where it is nested, and what it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutNode {
    pub id: String,
    /// Enclosing `TaskGraphTask`, `None` at the root.
    pub parent: Option<String>,
    pub task_type: TaskType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Selected,
    Related,
    Unrelated,
}

impl Graph {
    pub fn edges(&self) -> Result<Vec<Edge>> {
        let mut edges = Vec::new();

        for task in self.all_tasks() {
            for dep_id in task.declared_deps() {
                let dep = self.get_task(dep_id)?;
                edges.push(Edge {
                    source: dep.task_id.clone(),
                    target: task.task_id.clone(),
                    kind: EdgeKind::Output,
                });
            }
            if let Some(creator_id) = &task.created_by {
                let creator = self.get_task(creator_id)?;
                edges.push(Edge {
                    source: creator.task_id.clone(),
                    target: task.task_id.clone(),
                    kind: EdgeKind::Creation,
                });
            }
        }

        Ok(edges)
    }

    pub fn layout_nodes(&self) -> Vec<LayoutNode> {
        self.all_tasks()
            .map(|task| LayoutNode {
                id: task.task_id.clone(),
                parent: self.get_parent_task(&task.task_id).map(|parent| parent.task_id.clone()),
                task_type: task.task_type(),
            })
            .collect()
    }

    /// Emphasis of every task given the current selection. Without a
    /// selection every task counts as related.
    pub fn selection_states(&self, selected: Option<&str>) -> Result<BTreeMap<String, SelectionState>> {
        let Some(selected) = selected else {
            return Ok(self.all_tasks().map(|task| (task.task_id.clone(), SelectionState::Related)).collect());
        };

        let related = self.get_related_task_ids(selected)?;

        Ok(self
            .all_tasks()
            .map(|task| {
                let state = if task.task_id == selected {
                    SelectionState::Selected
                } else if related.contains(&task.task_id) {
                    SelectionState::Related
                } else {
                    SelectionState::Unrelated
                };
                (task.task_id.clone(), state)
            })
            .collect())
    }
}
