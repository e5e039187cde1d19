//! End-to-end planning over HTTP with file-backed execution log

use autodev_core::{heuristic, Architecture, HttpMethod};
use autodev_planning::{build_service, routes, PlanningResponse, PlanningSettings};
use autodev_store::ExecutionLogEntry;
use autodev_test_utils::{ecommerce_catalog_request, UnreachableModelClient};
use std::sync::Arc;
use warp::http::StatusCode;

#[tokio::test]
async fn ecommerce_story_falls_back_and_logs_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("executions.jsonl");
    let settings = PlanningSettings::default().with_execution_log(&log_path);

    let service = build_service(&settings)
        .unwrap()
        .with_model(Arc::new(UnreachableModelClient));
    let api = routes(Arc::new(service));

    let story = ecommerce_catalog_request();
    let response = warp::test::request()
        .method("POST")
        .path("/agents/planning")
        .json(&story)
        .reply(&api)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let planned: PlanningResponse = serde_json::from_slice(response.body()).unwrap();
    let architecture = &planned.architecture;
    assert_eq!(*architecture, heuristic::generate(&story));

    assert_eq!(architecture.database.tables.len(), 1);
    let table = &architecture.database.tables[0];
    assert_eq!(table.name, "ecommerce_product_catalog_data");
    assert!(table.columns.iter().all(|c| c.name != "user_id"));
    assert!(architecture.database.relationships.is_empty());

    let endpoints = &architecture.backend.endpoints;
    assert_eq!(endpoints.len(), 7);
    assert!(endpoints[..2]
        .iter()
        .all(|e| e.method == HttpMethod::Post && !e.auth_required));
    assert!(endpoints[2..].iter().all(|e| e.auth_required));

    let fetched = warp::test::request()
        .path("/agents/planning/session_US-002")
        .reply(&api)
        .await;
    let cached: Architecture = serde_json::from_slice(fetched.body()).unwrap();
    assert_eq!(&cached, architecture);

    let text = std::fs::read_to_string(&log_path).unwrap();
    let rows: Vec<ExecutionLogEntry> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.story_id == "US-002"));
}
