use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::domain::graph::Graph;
use crate::error::Result;

type DepsMap<'a> = HashMap<&'a str, Vec<&'a str>>;

impl Graph {
    /// Ids of every task relevant to `task_id` for display emphasis.
    ///
    /// The result holds `task_id` itself, the dependency and dependent
    /// closures at its own level and at every enclosing level, the enclosing
    /// `TaskGraphTask`s, and everything nested inside any related
    /// `TaskGraphTask` other than those enclosing ones.
    pub fn get_related_task_ids(&self, task_id: &str) -> Result<BTreeSet<String>> {
        // Fail early on unknown ids.
        self.get_task(task_id)?;

        let mut related: BTreeSet<String> = BTreeSet::new();
        related.insert(task_id.to_string());

        let mut ancestor_ids = Vec::new();
        let mut level_task_id = task_id;
        while let Some(ancestor) = self.get_parent_task(level_task_id) {
            ancestor_ids.push(ancestor.task_id.clone());
            if let Some(subgraph) = ancestor.subgraph() {
                related.extend(self.related_in_subgraph(subgraph, level_task_id)?);
            }
            level_task_id = &ancestor.task_id;
        }
        related.extend(self.related_in_subgraph(self, level_task_id)?);

        // Expand related TaskGraphTasks into their contents, transitively.
        let mut queue: VecDeque<String> = related.iter().cloned().collect();
        while let Some(queued_id) = queue.pop_front() {
            if let Some(subgraph) = self.get_task(&queued_id)?.subgraph() {
                for child in &subgraph.tasks {
                    if related.insert(child.task_id.clone()) {
                        queue.push_back(child.task_id.clone());
                    }
                }
            }
        }

        related.extend(ancestor_ids);
        log::debug!("Task '{}' has {} related tasks.", task_id, related.len());

        Ok(related)
    }

    /// Dependency and dependent closures of `task_id` among the direct tasks
    /// of `subgraph`. Dependencies are resolved against the whole tree but
    /// only edges between members of `subgraph` are followed.
    fn related_in_subgraph(&self, subgraph: &Graph, task_id: &str) -> Result<HashSet<String>> {
        let members: HashSet<&str> = subgraph.tasks.iter().map(|task| task.task_id.as_str()).collect();

        let mut forward: DepsMap<'_> = HashMap::new();
        let mut reverse: DepsMap<'_> = HashMap::new();
        for task in &subgraph.tasks {
            forward.entry(task.task_id.as_str()).or_default();
            reverse.entry(task.task_id.as_str()).or_default();
        }

        for task in &subgraph.tasks {
            for dep in self.get_dependencies(&task.task_id)? {
                let dep_id = dep.task_id.as_str();
                if !members.contains(dep_id) {
                    continue;
                }
                forward.entry(task.task_id.as_str()).or_default().push(dep_id);
                reverse.entry(dep_id).or_default().push(task.task_id.as_str());
            }
        }

        let mut related = transitive_closure(task_id, &forward);
        related.extend(transitive_closure(task_id, &reverse));
        Ok(related)
    }
}

/// Everything reachable from `start` through `deps_map`, excluding `start`.
fn transitive_closure(start: &str, deps_map: &DepsMap<'_>) -> HashSet<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        if seen.insert(current) {
            if let Some(next) = deps_map.get(current) {
                queue.extend(next.iter().copied());
            }
        }
    }

    seen.remove(start);
    seen.into_iter().map(str::to_string).collect()
}
