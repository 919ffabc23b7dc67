use crate::api::graph_dto::GraphDto;
use crate::domain::graph::Graph;
use crate::domain::session::Session;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Reads a task graph snapshot from a JSON file and validates it.
pub fn load_graph_file(file_path: &str) -> Result<Graph> {
    let graph_dto: GraphDto = parse_json_file::<GraphDto>(file_path)?;
    log::info!("JSON file '{}' parsed successfully.", file_path);

    Graph::try_from(graph_dto)
}

/// Starts an editing session on the snapshot stored in `file_path`.
pub fn open_session(file_path: &str) -> Result<Session> {
    logger::init();
    log::info!("Logger initialized. Opening task graph session.");

    let graph = load_graph_file(file_path)?;
    log::info!("Task graph loaded with {} tasks.", graph.all_tasks().count());

    Ok(Session::with_graph(graph))
}
