use serde_json::{Value, json};

use llm_taskgraph_editor::{
    domain::{graph::Graph, state::TaskState, task::TaskKind, view::SelectionState},
    load_graph_file,
};

const STORY_GRAPH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/story_graph.json");

fn story() -> Graph {
    load_graph_file(STORY_GRAPH).unwrap()
}

fn output(graph: &Graph, task_id: &str) -> Option<Value> {
    graph.get_task(task_id).unwrap().output_data.clone()
}

#[test]
fn test_edited_response_invalidates_downstream_subgraph() {
    let graph = story();

    let next = graph.on_edit(Some("outline"), "response", json!("intro\nending")).unwrap();

    assert_eq!(output(&next, "outline"), None);
    assert_eq!(output(&next, "write-sections"), None);
    assert_eq!(next.get_task("write-sections").unwrap().graph_input(), None);
    // The whole subgraph is cleared, but nothing in it is deleted.
    for task_id in ["fan-out", "section-intro", "join-sections"] {
        assert_eq!(output(&next, task_id), None, "{} should be cleared", task_id);
    }
    assert!(next.contains_task("section-intro"));
    assert_eq!(output(&next, "final-story"), None);

    assert_eq!(output(&next, "load-notes"), Some(json!(["tall", "coastal"])));
    assert_eq!(next.get_task("word-count").unwrap().error.as_deref(), Some("callback raised ValueError"));

    assert_eq!(next.get_task_state("outline").unwrap(), TaskState::Ready);
    assert_eq!(next.graph_state().unwrap(), Some(TaskState::Waiting));
    assert!(next.validate().is_ok());
}

#[test]
fn test_creator_still_complete_keeps_created_tasks() {
    let graph = story();

    let next = graph.on_edit(Some("fan-out"), "output_data", json!(4)).unwrap();

    assert_eq!(output(&next, "fan-out"), Some(json!(4)));
    assert_eq!(output(&next, "section-intro"), Some(json!("intro.")));
    assert_eq!(output(&next, "join-sections"), Some(json!("intro. storm. ending.")));
    assert_eq!(output(&next, "write-sections"), Some(json!("intro. storm. ending.")));
    assert_eq!(output(&next, "final-story"), Some(json!("The End.")));
}

#[test]
fn test_cleared_creator_deletes_created_tasks() {
    let graph = story();

    let next = graph.on_edit(Some("fan-out"), "output_data", Value::Null).unwrap();

    assert!(!next.contains_task("section-intro"));
    assert!(!next.contains_task("join-sections"));

    let write_sections = next.get_task("write-sections").unwrap();
    let subgraph = write_sections.subgraph().unwrap();
    assert_eq!(subgraph.tasks.len(), 1);
    assert!(subgraph.output_task.is_none());
    assert!(write_sections.output_data.is_none());
    assert_eq!(output(&next, "final-story"), None);

    assert_eq!(next.get_task_state("fan-out").unwrap(), TaskState::Ready);
    assert!(next.validate().is_ok());
    // The snapshot the edit was applied to still has everything.
    assert!(graph.contains_task("section-intro"));
}

#[test]
fn test_graph_input_edit_clears_every_task() {
    let graph = story();

    let next = graph.on_edit(None, "graph_input", json!({"topic": "glaciers"})).unwrap();

    assert!(next.all_tasks().all(|task| task.output_data.is_none()));
    match &next.get_task("outline").unwrap().kind {
        TaskKind::Llm(llm_task) => assert!(llm_task.response.is_none()),
        other => panic!("Expected an LLM task, got {:?}", other),
    }
    assert_eq!(next.get_task_state("load-notes").unwrap(), TaskState::Ready);
}

#[test]
fn test_selection_after_edit() {
    let graph = story().on_edit(Some("fan-out"), "output_data", Value::Null).unwrap();

    let states = graph.selection_states(Some("fan-out")).unwrap();

    assert_eq!(states["fan-out"], SelectionState::Selected);
    assert_eq!(states["outline"], SelectionState::Related);
    assert_eq!(states["word-count"], SelectionState::Unrelated);
    assert_eq!(states.len(), 6);
}
