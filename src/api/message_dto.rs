use serde::{Deserialize, Serialize};

use crate::api::graph_dto::GraphDto;

/// What the execution backend reports it is doing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendStateDto {
    #[serde(alias = "CONNECTED")]
    Connected,
    #[serde(alias = "WAITING")]
    Waiting,
    #[serde(alias = "RUNNING")]
    Running,
}

/// Snapshot pushed by the backend.
///
/// The first message after connecting also carries `initial_graph`, the graph
/// as it was before any run, so the client can reset to it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BackendMessageDto {
    pub backend_state: BackendStateDto,
    pub graph: GraphDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_graph: Option<GraphDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandDto {
    /// Run the attached graph.
    Start,
    /// Stop the running graph, optionally replacing it with the attached one.
    Stop,
}

/// Command sent from the editor to the backend.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientCommandDto {
    pub command: CommandDto,
    pub graph: Option<GraphDto>,
}
