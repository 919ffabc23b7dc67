use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A (sub)graph exactly as it travels over the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GraphDto {
    #[serde(default)]
    pub tasks: Vec<TaskDto>,
    #[serde(default)]
    pub graph_input: Option<Value>,
    #[serde(default)]
    pub output_task: Option<String>,
}

/// Fields shared by every task type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskBaseDto {
    pub task_id: String,
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub kwdeps: BTreeMap<String, String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub output_data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LlmTaskDto {
    #[serde(flatten)]
    pub base: TaskBaseDto,
    pub prompt_formatter_id: String,
    #[serde(default)]
    pub formatted_prompt: Option<Value>,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub response: Option<String>,
    pub output_parser_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PythonTaskDto {
    #[serde(flatten)]
    pub base: TaskBaseDto,
    pub callback_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskGraphTaskDto {
    #[serde(flatten)]
    pub base: TaskBaseDto,
    pub input_formatter_id: String,
    #[serde(default)]
    pub graph_input: Option<Value>,
    pub subgraph: GraphDto,
}

/// A task tagged by its `type` field.
///
/// Tags other than the three known ones are kept as an explicit
/// [`TaskDto::Unsupported`] marker so the conversion into the domain model can
/// report them instead of dropping the task.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum TaskDto {
    #[serde(rename = "LLMTask")]
    Llm(LlmTaskDto),
    #[serde(rename = "PythonTask")]
    Python(PythonTaskDto),
    #[serde(rename = "TaskGraphTask")]
    TaskGraph(TaskGraphTaskDto),
    #[serde(skip_serializing)]
    Unsupported { task_type: String, task_id: String },
}

impl<'de> Deserialize<'de> for TaskDto {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let task_type = match value.get("type") {
            Some(Value::String(task_type)) => task_type.clone(),
            Some(other) => other.to_string(),
            None => return Err(D::Error::missing_field("type")),
        };

        match task_type.as_str() {
            "LLMTask" => serde_json::from_value(value).map(TaskDto::Llm).map_err(D::Error::custom),
            "PythonTask" => serde_json::from_value(value).map(TaskDto::Python).map_err(D::Error::custom),
            "TaskGraphTask" => serde_json::from_value(value).map(TaskDto::TaskGraph).map_err(D::Error::custom),
            _ => {
                let task_id = value.get("task_id").and_then(Value::as_str).unwrap_or_default().to_string();
                Ok(TaskDto::Unsupported { task_type, task_id })
            }
        }
    }
}
