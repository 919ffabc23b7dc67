use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::api::graph_dto::{LlmTaskDto, PythonTaskDto, TaskBaseDto, TaskDto, TaskGraphTaskDto};
use crate::domain::graph::Graph;
use crate::error::Error;

/// Discriminant of [`TaskKind`], carrying the wire name of each task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    LlmTask,
    PythonTask,
    TaskGraphTask,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::LlmTask => "LLMTask",
            TaskType::PythonTask => "PythonTask",
            TaskType::TaskGraphTask => "TaskGraphTask",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single node of the task graph.
///
/// `deps`, `kwdeps` and `created_by` are ids resolved through the graph, never
/// owned links, so any task can be removed from the tree on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub task_id: String,
    pub deps: Vec<String>,
    pub kwdeps: BTreeMap<String, String>,
    /// Set when this task was spawned while another task was executing.
    pub created_by: Option<String>,
    pub output_data: Option<Value>,
    pub error: Option<String>,
    pub kind: TaskKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    Llm(LlmTask),
    Python(PythonTask),
    Graph(GraphTask),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmTask {
    pub prompt_formatter_id: String,
    pub formatted_prompt: Option<Value>,
    pub params: Value,
    pub response: Option<String>,
    pub output_parser_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PythonTask {
    pub callback_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphTask {
    pub input_formatter_id: String,
    /// Mirrored into `subgraph.graph_input` whenever it is edited.
    pub graph_input: Option<Value>,
    pub subgraph: Graph,
}

impl Task {
    pub fn task_type(&self) -> TaskType {
        match &self.kind {
            TaskKind::Llm(_) => TaskType::LlmTask,
            TaskKind::Python(_) => TaskType::PythonTask,
            TaskKind::Graph(_) => TaskType::TaskGraphTask,
        }
    }

    /// The nested graph of a `TaskGraphTask`.
    pub fn subgraph(&self) -> Option<&Graph> {
        match &self.kind {
            TaskKind::Graph(graph_task) => Some(&graph_task.subgraph),
            _ => None,
        }
    }

    pub fn subgraph_mut(&mut self) -> Option<&mut Graph> {
        match &mut self.kind {
            TaskKind::Graph(graph_task) => Some(&mut graph_task.subgraph),
            _ => None,
        }
    }

    /// Input of a `TaskGraphTask`; other task types have none.
    pub fn graph_input(&self) -> Option<&Value> {
        match &self.kind {
            TaskKind::Graph(graph_task) => graph_task.graph_input.as_ref(),
            _ => None,
        }
    }

    /// Positional followed by named dependency ids.
    pub fn declared_deps(&self) -> impl Iterator<Item = &str> {
        self.deps.iter().chain(self.kwdeps.values()).map(String::as_str)
    }

    /// Declared dependencies plus the creating task, if any.
    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.declared_deps().chain(self.created_by.as_deref())
    }

    pub fn is_complete(&self) -> bool {
        self.output_data.is_some()
    }

    /// Clears every computed field. Nested graphs are cleared recursively.
    pub fn invalidate(&mut self) {
        self.output_data = None;
        match &mut self.kind {
            TaskKind::Graph(graph_task) => {
                graph_task.graph_input = None;
                graph_task.subgraph.invalidate_all();
            }
            TaskKind::Llm(llm_task) => {
                llm_task.formatted_prompt = None;
                llm_task.response = None;
            }
            TaskKind::Python(_) => {}
        }
    }
}

impl TryFrom<TaskDto> for Task {
    type Error = Error;

    fn try_from(dto: TaskDto) -> Result<Self, Self::Error> {
        let (base, kind) = match dto {
            TaskDto::Llm(llm) => (
                llm.base,
                TaskKind::Llm(LlmTask {
                    prompt_formatter_id: llm.prompt_formatter_id,
                    formatted_prompt: llm.formatted_prompt,
                    params: llm.params,
                    response: llm.response,
                    output_parser_id: llm.output_parser_id,
                }),
            ),
            TaskDto::Python(python) => (python.base, TaskKind::Python(PythonTask { callback_id: python.callback_id })),
            TaskDto::TaskGraph(graph_task) => {
                let subgraph = Graph::from_dto_unchecked(graph_task.subgraph)?;
                (
                    graph_task.base,
                    TaskKind::Graph(GraphTask {
                        input_formatter_id: graph_task.input_formatter_id,
                        graph_input: graph_task.graph_input,
                        subgraph,
                    }),
                )
            }
            TaskDto::Unsupported { task_type, task_id } => {
                return Err(Error::UnsupportedTaskType { task_type, task_id });
            }
        };

        let TaskBaseDto {
            task_id,
            deps,
            kwdeps,
            created_by,
            output_data,
            error,
        } = base;

        Ok(Task {
            task_id,
            deps,
            kwdeps,
            created_by,
            output_data,
            error,
            kind,
        })
    }
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        let base = TaskBaseDto {
            task_id: task.task_id.clone(),
            deps: task.deps.clone(),
            kwdeps: task.kwdeps.clone(),
            created_by: task.created_by.clone(),
            output_data: task.output_data.clone(),
            error: task.error.clone(),
        };

        match &task.kind {
            TaskKind::Llm(llm) => TaskDto::Llm(LlmTaskDto {
                base,
                prompt_formatter_id: llm.prompt_formatter_id.clone(),
                formatted_prompt: llm.formatted_prompt.clone(),
                params: llm.params.clone(),
                response: llm.response.clone(),
                output_parser_id: llm.output_parser_id.clone(),
            }),
            TaskKind::Python(python) => TaskDto::Python(PythonTaskDto {
                base,
                callback_id: python.callback_id.clone(),
            }),
            TaskKind::Graph(graph_task) => TaskDto::TaskGraph(TaskGraphTaskDto {
                base,
                input_formatter_id: graph_task.input_formatter_id.clone(),
                graph_input: graph_task.graph_input.clone(),
                subgraph: (&graph_task.subgraph).into(),
            }),
        }
    }
}
