//! Route Tests
//!
//! Drives the warp filters in-process with `warp::test`.

use feedback_core::{FeedbackConfig, FeedbackOrchestrator, FeedbackResponse};
use feedback_http::routes;
use feedback_scenario::ScenarioKey;
use feedback_store::MemoryPatternStore;
use feedback_test_utils::{CountingGenerator, FailingGenerator};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn orchestrator_with(generator: Arc<dyn feedback_core::FeedbackGenerator>) -> Arc<FeedbackOrchestrator> {
    Arc::new(FeedbackOrchestrator::new(
        generator,
        Arc::new(MemoryPatternStore::default()),
        FeedbackConfig::default().with_max_retries(0),
    ))
}

fn body(block_number: u32, accuracy: f64) -> Value {
    json!({
        "participantInfo": { "id": "p-9", "nickname": "Mika", "language": "en" },
        "blockData": {
            "blockNumber": block_number,
            "accuracy": accuracy,
            "averageRT": 640.0,
            "previousBlock": { "accuracy": 80.0, "averageRT": 710.0 }
        }
    })
}

#[tokio::test]
async fn test_health() {
    let api = routes(orchestrator_with(Arc::new(CountingGenerator::new())));
    let res = warp::test::request().method("GET").path("/health").reply(&api).await;

    assert_eq!(res.status(), 200);
    let value: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn test_feedback_generates_then_caches() {
    let generator = Arc::new(CountingGenerator::new());
    let api = routes(orchestrator_with(generator.clone()));

    let first = warp::test::request()
        .method("POST")
        .path("/api/feedback")
        .json(&body(2, 86.0))
        .reply(&api)
        .await;
    assert_eq!(first.status(), 200);
    let first: FeedbackResponse = serde_json::from_slice(first.body()).unwrap();
    assert!(!first.cached);
    assert_eq!(first.scenario, ScenarioKey::RtShortAccUp);

    let second = warp::test::request()
        .method("POST")
        .path("/api/feedback")
        .json(&body(3, 86.0))
        .reply(&api)
        .await;
    let second: FeedbackResponse = serde_json::from_slice(second.body()).unwrap();
    assert!(second.cached);
    assert_eq!(second.feedback_patterns, first.feedback_patterns);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_force_flag_regenerates() {
    let generator = Arc::new(CountingGenerator::new());
    let api = routes(orchestrator_with(generator.clone()));

    let mut forced = body(2, 86.0);
    forced["force"] = json!(true);
    for _ in 0..2 {
        let res = warp::test::request()
            .method("POST")
            .path("/api/feedback")
            .json(&forced)
            .reply(&api)
            .await;
        assert_eq!(res.status(), 200);
    }
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_generation_failure_still_answers() {
    let api = routes(orchestrator_with(Arc::new(FailingGenerator::transport())));
    let res = warp::test::request()
        .method("POST")
        .path("/api/feedback")
        .json(&body(2, 86.0))
        .reply(&api)
        .await;

    assert_eq!(res.status(), 200);
    let value: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(value["fallback"], true);
    assert_eq!(value["participantId"], "p-9");
}

#[tokio::test]
async fn test_invalid_block_is_bad_request() {
    let api = routes(orchestrator_with(Arc::new(CountingGenerator::new())));
    let res = warp::test::request()
        .method("POST")
        .path("/api/feedback")
        .json(&body(2, 140.0))
        .reply(&api)
        .await;

    assert_eq!(res.status(), 400);
    let value: Value = serde_json::from_slice(res.body()).unwrap();
    assert!(value["error"].as_str().unwrap().contains("accuracy"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let api = routes(orchestrator_with(Arc::new(CountingGenerator::new())));
    let res = warp::test::request()
        .method("POST")
        .path("/api/feedback")
        .header("content-type", "application/json")
        .body("{\"participantInfo\": ")
        .reply(&api)
        .await;

    assert_eq!(res.status(), 400);
    let value: Value = serde_json::from_slice(res.body()).unwrap();
    assert!(value["error"].is_string());
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let api = routes(orchestrator_with(Arc::new(CountingGenerator::new())));
    let res = warp::test::request().method("GET").path("/nope").reply(&api).await;
    assert_eq!(res.status(), 404);
}
