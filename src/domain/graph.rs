use serde_json::Value;

use crate::api::graph_dto::GraphDto;
use crate::domain::task::Task;
use crate::error::Error;

/// The root task graph, or the subgraph owned by a `TaskGraphTask`.
///
/// A `Graph` owns its tasks outright; the whole snapshot is a tree of values
/// and `clone()` yields a fully independent copy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    /// `None` until the input has been supplied.
    pub graph_input: Option<Value>,
    /// Id of the task whose output is the graph's output.
    pub output_task: Option<String>,
    /// Declaration order, which is a topological order of the dependencies.
    pub tasks: Vec<Task>,
}

impl Graph {
    /// Independent deep copy used as the starting point of every edit.
    pub fn copy(&self) -> Graph {
        self.clone()
    }

    /// Converts a (sub)graph DTO without running the tree-wide integrity
    /// checks. Nested graphs are converted through this so the checks run
    /// once, on the root.
    pub(crate) fn from_dto_unchecked(dto: GraphDto) -> Result<Self, Error> {
        let tasks = dto.tasks.into_iter().map(Task::try_from).collect::<Result<Vec<_>, _>>()?;

        Ok(Graph {
            graph_input: dto.graph_input,
            output_task: dto.output_task,
            tasks,
        })
    }

    /// Invalidates every task of this graph, recursing into subgraphs.
    pub fn invalidate_all(&mut self) {
        for task in &mut self.tasks {
            task.invalidate();
        }
    }
}

/// Builds the domain graph from an inbound snapshot.
///
/// Fails on unsupported task types, duplicate ids, dangling references and
/// dependency cycles.
impl TryFrom<GraphDto> for Graph {
    type Error = Error;

    fn try_from(dto: GraphDto) -> Result<Self, Self::Error> {
        let graph = Graph::from_dto_unchecked(dto)?;
        graph.validate()?;

        log::debug!("Task graph snapshot converted ({} tasks).", graph.all_tasks().count());

        Ok(graph)
    }
}

impl From<&Graph> for GraphDto {
    fn from(graph: &Graph) -> Self {
        GraphDto {
            tasks: graph.tasks.iter().map(Into::into).collect(),
            graph_input: graph.graph_input.clone(),
            output_task: graph.output_task.clone(),
        }
    }
}
