use serde_json::Value;

use crate::api::graph_dto::GraphDto;
use crate::api::message_dto::{BackendMessageDto, BackendStateDto, ClientCommandDto, CommandDto};
use crate::domain::graph::Graph;
use crate::error::{Error, Result};
use crate::loader::parser::parse_json_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Running,
}

/// Holds the snapshot currently on display.
///
/// The snapshot is only ever replaced, never mutated in place: edits produce
/// a new graph from a copy and install it, and every inbound message installs
/// the graph it carries. The last snapshot installed wins.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Graph>,
    initial: Option<Graph>,
    backend_state: Option<BackendStateDto>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session showing `graph`, which also becomes the reset target.
    pub fn with_graph(graph: Graph) -> Self {
        Session {
            current: Some(graph.clone()),
            initial: Some(graph),
            backend_state: None,
        }
    }

    pub fn current(&self) -> Option<&Graph> {
        self.current.as_ref()
    }

    pub fn initial(&self) -> Option<&Graph> {
        self.initial.as_ref()
    }

    pub fn backend_state(&self) -> Option<BackendStateDto> {
        self.backend_state
    }

    pub fn state(&self) -> SessionState {
        match self.backend_state {
            Some(BackendStateDto::Running) => SessionState::Running,
            _ => SessionState::Editing,
        }
    }

    /// Installs the graph carried by a backend message. If the graph fails
    /// validation nothing changes.
    pub fn receive(&mut self, message: BackendMessageDto) -> Result<()> {
        let graph = Graph::try_from(message.graph)?;
        let initial = message.initial_graph.map(Graph::try_from).transpose()?;

        log::info!("Installing snapshot from backend ({:?}, {} tasks).", message.backend_state, graph.all_tasks().count());

        self.current = Some(graph);
        if initial.is_some() {
            self.initial = initial;
        }
        self.backend_state = Some(message.backend_state);

        Ok(())
    }

    pub fn receive_json(&mut self, text: &str) -> Result<()> {
        let message: BackendMessageDto = parse_json_str(text)?;
        self.receive(message)
    }

    /// Edits the current snapshot and installs the result. A rejected edit
    /// leaves the current snapshot in place.
    pub fn edit(&mut self, task_id: Option<&str>, field_name: &str, new_value: Value) -> Result<&Graph> {
        let current = self.current.as_ref().ok_or(Error::NoSnapshot)?;

        let next = current.on_edit(task_id, field_name, new_value).inspect_err(|e| {
            log::warn!("Edit of {} on '{}' rejected: {}", field_name, task_id.unwrap_or("graph"), e);
        })?;

        Ok(self.current.insert(next))
    }

    /// Puts the snapshot the backend started from back on display.
    pub fn reset_to_initial(&mut self) -> Result<&Graph> {
        let initial = self.initial.clone().ok_or(Error::NoSnapshot)?;
        Ok(self.current.insert(initial))
    }

    /// Asks the backend to run the current snapshot.
    pub fn start_command(&self) -> Result<ClientCommandDto> {
        let current = self.current.as_ref().ok_or(Error::NoSnapshot)?;

        Ok(ClientCommandDto {
            command: CommandDto::Start,
            graph: Some(GraphDto::from(current)),
        })
    }

    /// Asks the backend to stop, handing it the current snapshot if there is
    /// one.
    pub fn stop_command(&self) -> ClientCommandDto {
        ClientCommandDto {
            command: CommandDto::Stop,
            graph: self.current.as_ref().map(GraphDto::from),
        }
    }
}
