use std::fs;

use serde_json::json;

use llm_taskgraph_editor::{
    api::message_dto::BackendStateDto,
    domain::session::{Session, SessionState},
    error::Error,
    open_session,
};

const STORY_GRAPH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/story_graph.json");
const BACKEND_RUNNING: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/backend_running.json");

fn running_message() -> String {
    fs::read_to_string(BACKEND_RUNNING).unwrap()
}

#[test]
fn test_empty_session() {
    let mut session = Session::new();

    assert!(session.current().is_none());
    assert_eq!(session.state(), SessionState::Editing);
    assert!(matches!(session.edit(None, "graph_input", json!(1)), Err(Error::NoSnapshot)));
    assert!(matches!(session.reset_to_initial(), Err(Error::NoSnapshot)));
    assert!(matches!(session.start_command(), Err(Error::NoSnapshot)));

    let stop = serde_json::to_value(session.stop_command()).unwrap();
    assert_eq!(stop, json!({"command": "STOP", "graph": null}));
}

#[test]
fn test_receive_running_snapshot() {
    let mut session = Session::new();

    session.receive_json(&running_message()).unwrap();

    assert_eq!(session.backend_state(), Some(BackendStateDto::Running));
    assert_eq!(session.state(), SessionState::Running);
    let current = session.current().unwrap();
    assert_eq!(current.graph_input, Some(json!(2)));
    assert!(current.contains_task("double"));
    // No initial graph was sent along.
    assert!(session.initial().is_none());
}

#[test]
fn test_receive_keeps_previous_snapshot_on_bad_message() {
    let mut session = Session::new();
    session.receive_json(&running_message()).unwrap();

    let bad = json!({
        "backend_state": "waiting",
        "graph": {"tasks": [{"type": "PythonTask", "task_id": "x", "deps": ["ghost"], "callback_id": "f"}]}
    });
    let err = session.receive_json(&bad.to_string()).unwrap_err();

    assert!(matches!(err, Error::DanglingReference { .. }));
    assert!(session.current().unwrap().contains_task("double"));
    assert_eq!(session.state(), SessionState::Running);

    assert!(matches!(session.receive_json("{\"graph\": "), Err(Error::DeserializationError(_))));
}

#[test]
fn test_initial_graph_and_reset() {
    let mut session = Session::new();
    let message = json!({
        "backend_state": "connected",
        "graph": {
            "graph_input": 2,
            "output_task": "double",
            "tasks": [{"type": "PythonTask", "task_id": "double", "output_data": 4, "callback_id": "double"}]
        },
        "initial_graph": {
            "graph_input": 2,
            "output_task": "double",
            "tasks": [{"type": "PythonTask", "task_id": "double", "callback_id": "double"}]
        }
    });
    session.receive_json(&message.to_string()).unwrap();
    assert_eq!(session.state(), SessionState::Editing);

    let edited = session.edit(Some("double"), "output_data", json!(5)).unwrap();
    assert_eq!(edited.get_task("double").unwrap().output_data, Some(json!(5)));

    let reset = session.reset_to_initial().unwrap();
    assert_eq!(reset.get_task("double").unwrap().output_data, None);
    assert_eq!(session.current(), session.initial());
}

#[test]
fn test_rejected_edit_keeps_snapshot() {
    let mut session = Session::new();
    session.receive_json(&running_message()).unwrap();
    let before = session.current().cloned();

    let err = session.edit(Some("double"), "graph_input", json!(3)).unwrap_err();

    assert!(err.is_rejected_edit());
    assert_eq!(session.current().cloned(), before);
}

#[test]
fn test_start_command_carries_edited_graph() {
    let mut session = Session::new();
    session.receive_json(&running_message()).unwrap();
    session.edit(None, "graph_input", json!(21)).unwrap();

    let command = serde_json::to_value(session.start_command().unwrap()).unwrap();

    assert_eq!(command["command"], json!("START"));
    assert_eq!(command["graph"]["graph_input"], json!(21));
    assert_eq!(command["graph"]["tasks"][0]["type"], json!("PythonTask"));
    assert_eq!(command["graph"]["tasks"][0]["task_id"], json!("double"));
}

#[test]
fn test_open_session_from_file() {
    let mut session = open_session(STORY_GRAPH).unwrap();

    assert_eq!(session.current(), session.initial());
    assert!(session.backend_state().is_none());

    session.edit(Some("outline"), "response", json!("intro")).unwrap();
    assert_ne!(session.current(), session.initial());

    session.reset_to_initial().unwrap();
    assert_eq!(session.current(), session.initial());
}
