//! MCP stdio server driven through in-memory reader and writer

mod common;

use std::io::Cursor;

use polymath::mcp::McpServer;
use serde_json::{json, Value};

use common::{engine_with, entropy, evolution};

fn run(server: &McpServer, requests: &[Value]) -> Vec<Value> {
    let input: String = requests
        .iter()
        .map(|r| format!("{}\n", r))
        .collect();
    let mut output = Vec::new();
    server.serve(Cursor::new(input), &mut output).unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

#[test]
fn test_initialize_then_list() {
    let server = McpServer::new(engine_with(vec![entropy(), evolution()]), 1800);
    let responses = run(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}),
        ],
    );

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "polymath");
    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 15);
    assert_eq!(responses[2]["error"]["code"], -32601);
}

#[test]
fn test_wrong_jsonrpc_version() {
    let server = McpServer::new(engine_with(vec![]), 1800);
    let responses = run(&server, &[json!({"jsonrpc": "1.0", "id": 9, "method": "tools/list"})]);
    assert_eq!(responses[0]["error"]["code"], -32600);
    assert_eq!(responses[0]["id"], 9);
}

#[test]
fn test_suggest_fusion_tool() {
    let server = McpServer::new(engine_with(vec![entropy(), evolution()]), 1800);
    let responses = run(
        &server,
        &[tool_call(
            1,
            "suggest_fusion",
            json!({"concept_a": "entropy", "concept_b": "evolution"}),
        )],
    );
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Structural Isomorphism"));
    assert!(!text.contains("Assumption Subversion"));
}

#[test]
fn test_unknown_concept_is_negative_result() {
    let server = McpServer::new(engine_with(vec![]), 1800);
    let responses = run(&server, &[tool_call(1, "find_bridges", json!({"concept": "aether"}))]);
    assert!(responses[0].get("error").is_none());
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("No concept found"));
}

#[test]
fn test_dialogue_over_the_wire() {
    let server = McpServer::new(engine_with(vec![entropy(), evolution()]), 1800);
    let start = run(&server, &[tool_call(1, "start_dialogue", json!({"focus": "entropy"}))]);
    let reply: Value =
        serde_json::from_str(start[0]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    let session = reply["session_id"].as_str().unwrap().to_string();
    assert_eq!(server.sessions().len(), 1);

    let turns = run(
        &server,
        &[
            tool_call(
                2,
                "advance_dialogue",
                json!({"session_id": session, "answer": "Order never lasts."}),
            ),
            tool_call(
                3,
                "advance_dialogue",
                json!({"session_id": session, "answer": "Fair point.", "mode": "viewpoints"}),
            ),
            tool_call(4, "end_dialogue", json!({"session_id": session})),
            tool_call(5, "export_dialogue", json!({"session_id": session})),
        ],
    );

    let second: Value =
        serde_json::from_str(turns[0]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(second["mode"], "challenge_premise");
    let third: Value =
        serde_json::from_str(turns[1]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(third["mode"], "explore_viewpoints");
    assert_eq!(third["depth"], 3);

    let summary: Value =
        serde_json::from_str(turns[2]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(summary["summary"]["challenged_premises"][0], "order never lasts");

    let md = turns[3]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(md.contains("**A:** Order never lasts."));
}

#[test]
fn test_expired_session_is_rejected() {
    let server = McpServer::new(engine_with(vec![entropy()]), 60);
    let start = run(&server, &[tool_call(1, "start_dialogue", json!({"focus": "entropy"}))]);
    let reply: Value =
        serde_json::from_str(start[0]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    let session = reply["session_id"].as_str().unwrap().to_string();

    let later = chrono::Utc::now() + chrono::Duration::hours(1);
    assert_eq!(server.sessions().expire_idle(later), 1);

    let responses = run(
        &server,
        &[tool_call(2, "advance_dialogue", json!({"session_id": session, "answer": "hello"}))],
    );
    assert_eq!(responses[0]["error"]["code"], -32602);
}

#[test]
fn test_session_tools_over_the_wire() {
    let server = McpServer::new(engine_with(vec![entropy(), evolution()]), 1800);
    let started = run(&server, &[tool_call(1, "start_dialogue", json!({"focus": "entropy"}))]);
    let reply: Value =
        serde_json::from_str(started[0]["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
    let id = reply["session_id"].as_str().unwrap().to_string();

    let responses = run(
        &server,
        &[
            tool_call(2, "list_sessions", json!({"status": "all"})),
            tool_call(3, "get_session_summary", json!({"session_id": id})),
            tool_call(
                4,
                "get_learning_path",
                json!({"start_concept": "entropy", "path_type": "bridge", "goal": "evolution"}),
            ),
        ],
    );
    assert_eq!(responses.len(), 3);

    let listed = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(listed.contains(&id));
    let summary = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(summary.contains("\"focus\": \"Entropy\""));
    let path = responses[2]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(path.contains("Focus: arrival and integration"));
}
