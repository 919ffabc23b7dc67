use std::collections::{HashMap, HashSet};

use crate::domain::graph::Graph;
use crate::domain::task::Task;
use crate::error::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl Graph {
    /// Checks the tree-wide invariants of a snapshot: unique task ids,
    /// resolvable references and an acyclic dependency relation.
    pub fn validate(&self) -> Result<()> {
        let mut tasks_by_id: HashMap<&str, &Task> = HashMap::new();
        for task in self.all_tasks() {
            if tasks_by_id.insert(task.task_id.as_str(), task).is_some() {
                return Err(Error::DuplicateTaskId(task.task_id.clone()));
            }
        }

        let ids: HashSet<&str> = tasks_by_id.keys().copied().collect();
        check_output_tasks(self, "graph", &ids)?;

        for task in self.all_tasks() {
            for dep in &task.deps {
                check_reference(&task.task_id, dep, "deps", &ids)?;
            }
            for dep in task.kwdeps.values() {
                check_reference(&task.task_id, dep, "kwdeps", &ids)?;
            }
            if let Some(creator) = &task.created_by {
                check_reference(&task.task_id, creator, "created_by", &ids)?;
            }
            if let Some(subgraph) = task.subgraph() {
                check_output_tasks(subgraph, &task.task_id, &ids)?;
            }
        }

        let mut visits: HashMap<&str, Visit> = HashMap::new();
        for task in self.all_tasks() {
            visit(task.task_id.as_str(), &tasks_by_id, &mut visits)?;
        }

        Ok(())
    }
}

fn check_reference(owner: &str, reference: &str, via: &'static str, ids: &HashSet<&str>) -> Result<()> {
    if ids.contains(reference) {
        Ok(())
    } else {
        Err(Error::DanglingReference {
            owner: owner.to_string(),
            reference: reference.to_string(),
            via,
        })
    }
}

fn check_output_tasks(graph: &Graph, owner: &str, ids: &HashSet<&str>) -> Result<()> {
    match &graph.output_task {
        Some(output_task) => check_reference(owner, output_task, "output_task", ids),
        None => Ok(()),
    }
}

/// Depth-first search over `deps` and `kwdeps`; reaching a task that is
/// still in progress closes a cycle.
fn visit<'a>(task_id: &'a str, tasks_by_id: &HashMap<&'a str, &'a Task>, visits: &mut HashMap<&'a str, Visit>) -> Result<()> {
    match visits.get(task_id) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => return Err(Error::DependencyCycle(task_id.to_string())),
        None => {}
    }

    visits.insert(task_id, Visit::InProgress);
    if let Some(task) = tasks_by_id.get(task_id).copied() {
        for dep in task.declared_deps() {
            visit(dep, tasks_by_id, visits)?;
        }
    }
    visits.insert(task_id, Visit::Done);

    Ok(())
}
