use serde_json::Value;

use crate::domain::graph::Graph;
use crate::domain::task::{Task, TaskKind, TaskType};
use crate::error::{Error, Result};

/// A field a user may edit by hand, already checked against the task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    /// `graph_input` of the root graph or of a `TaskGraphTask`.
    GraphInput,
    /// `formatted_prompt` of an `LLMTask`.
    FormattedPrompt,
    /// `response` of an `LLMTask`.
    Response,
    OutputData,
}

impl EditField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditField::GraphInput => "graph_input",
            EditField::FormattedPrompt => "formatted_prompt",
            EditField::Response => "response",
            EditField::OutputData => "output_data",
        }
    }

    /// Resolves `field_name` for a task of `task_type`; `None` stands for the
    /// root graph itself.
    pub fn parse(task_type: Option<TaskType>, field_name: &str) -> Result<EditField> {
        let field = match (task_type, field_name) {
            (None, "graph_input") => EditField::GraphInput,
            (Some(TaskType::LlmTask), "formatted_prompt") => EditField::FormattedPrompt,
            (Some(TaskType::LlmTask), "response") => EditField::Response,
            (Some(TaskType::LlmTask), "output_data") => EditField::OutputData,
            (Some(TaskType::PythonTask), "output_data") => EditField::OutputData,
            (Some(TaskType::TaskGraphTask), "graph_input") => EditField::GraphInput,
            (Some(TaskType::TaskGraphTask), "output_data") => EditField::OutputData,
            _ => {
                return Err(Error::InvalidField {
                    task_type: task_type.map_or("Graph", |task_type| task_type.as_str()).to_string(),
                    field: field_name.to_string(),
                });
            }
        };

        Ok(field)
    }
}

/// JSON `null` clears a field.
fn optional(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        value => Some(value),
    }
}

fn optional_string(field: EditField, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        other => Err(Error::InvalidFieldValue {
            field: field.as_str().to_string(),
            reason: format!("expected a string or null, got {}", other),
        }),
    }
}

impl Graph {
    /// Sets a field of the root graph. Every task is invalidated.
    pub(crate) fn apply_graph_edit(&mut self, field: EditField, value: Value) {
        if field == EditField::GraphInput {
            self.graph_input = optional(value);
            self.invalidate_all();
        }
    }
}

impl Task {
    /// Sets a field and clears whatever the new value makes stale on this
    /// task. Fails without touching the task if the value has the wrong shape.
    pub(crate) fn apply_edit(&mut self, field: EditField, value: Value) -> Result<()> {
        let task_type = self.task_type();

        match (&mut self.kind, field) {
            (TaskKind::Llm(llm_task), EditField::FormattedPrompt) => {
                llm_task.formatted_prompt = optional(value);
                llm_task.response = None;
                self.output_data = None;
                self.error = None;
            }
            (TaskKind::Llm(llm_task), EditField::Response) => {
                llm_task.response = optional_string(field, value)?;
                self.output_data = None;
                self.error = None;
            }
            (TaskKind::Llm(_), EditField::OutputData) => {
                self.output_data = optional(value);
            }
            (TaskKind::Python(_), EditField::OutputData) => {
                self.output_data = optional(value);
                self.error = None;
            }
            (TaskKind::Graph(graph_task), EditField::GraphInput) => {
                graph_task.graph_input = optional(value);
                graph_task.subgraph.graph_input = graph_task.graph_input.clone();
                graph_task.subgraph.invalidate_all();
                self.output_data = None;
            }
            (TaskKind::Graph(_), EditField::OutputData) => {
                self.output_data = optional(value);
            }
            (_, field) => {
                return Err(Error::InvalidField {
                    task_type: task_type.to_string(),
                    field: field.as_str().to_string(),
                });
            }
        }

        Ok(())
    }
}
