use log::Level;
use logtest::Logger;
use serde_json::json;

use llm_taskgraph_editor::domain::session::Session;

const BACKEND_RUNNING: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/backend_running.json");

// logtest installs a process-wide logger, so this binary holds a single test.
#[test]
fn test_edits_are_logged() {
    let mut logger = Logger::start();

    let mut session = Session::new();
    session.receive_json(&std::fs::read_to_string(BACKEND_RUNNING).unwrap()).unwrap();
    session.edit(Some("double"), "output_data", json!(4)).unwrap();
    let _ = session.edit(Some("double"), "response", json!("four"));

    let mut records = Vec::new();
    while let Some(record) = logger.pop() {
        records.push((record.level(), record.args().to_string()));
    }

    assert!(
        records
            .iter()
            .any(|(level, message)| *level == Level::Info && message.contains("output_data of 'double'"))
    );
    assert!(
        records
            .iter()
            .any(|(level, message)| *level == Level::Warn && message.contains("rejected"))
    );
}
