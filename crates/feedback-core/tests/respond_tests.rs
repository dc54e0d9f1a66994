//! End-to-end request handling
//!
//! Wire request in, resolved patterns and the selected message out.

use feedback_core::prelude::*;
use feedback_core::{neutral_message, variant_index};
use feedback_test_utils::{CountingGenerator, FailingGenerator};
use serde_json::json;
use std::sync::Arc;

fn orchestrator(generator: Arc<dyn FeedbackGenerator>) -> FeedbackOrchestrator {
    FeedbackOrchestrator::new(
        generator,
        Arc::new(MemoryPatternStore::default()),
        FeedbackConfig::default().with_max_retries(0),
    )
}

fn request(block: serde_json::Value) -> FeedbackRequest {
    serde_json::from_value(json!({
        "participantInfo": {
            "id": "p-7",
            "nickname": "Mika",
            "tonePreference": "casual",
            "language": "en"
        },
        "blockData": block
    }))
    .unwrap()
}

#[tokio::test]
async fn test_faster_and_more_accurate() {
    let orchestrator = orchestrator(Arc::new(CountingGenerator::new()));
    let response = orchestrator
        .respond(request(json!({
            "blockNumber": 2,
            "accuracy": 86.0,
            "averageRT": 640.0,
            "previousBlock": { "accuracy": 80.0, "averageRT": 710.0 }
        })))
        .await
        .unwrap();

    assert_eq!(response.scenario, ScenarioKey::RtShortAccUp);
    assert_eq!(response.participant_id.as_str(), "p-7");
    assert!(!response.cached);
    assert!(!response.fallback);
    assert_eq!(
        Some(response.message.as_str()),
        response
            .feedback_patterns
            .variant(ScenarioKey::RtShortAccUp, variant_index(2))
    );
}

#[tokio::test]
async fn test_fatigue_detected() {
    let orchestrator = orchestrator(Arc::new(CountingGenerator::new()));
    let response = orchestrator
        .respond(request(json!({
            "blockNumber": 5,
            "accuracy": 60.0,
            "averageRT": 900.0,
            "previousBlock": { "accuracy": 85.0, "averageRT": 700.0 }
        })))
        .await
        .unwrap();

    assert_eq!(response.scenario, ScenarioKey::RtSlowAccDownFatigue);
    assert!(response.message.contains("rt_slow_acc_down_fatigue #2"));
}

#[tokio::test]
async fn test_first_block_is_steady() {
    let orchestrator = orchestrator(Arc::new(CountingGenerator::new()));
    let response = orchestrator
        .respond(request(json!({
            "blockNumber": 1,
            "accuracy": 75.0,
            "averageRT": 650.0
        })))
        .await
        .unwrap();

    assert_eq!(response.scenario, ScenarioKey::RtSameAccSame);
    assert!(response.message.contains("rt_same_acc_same #1"));
}

#[tokio::test]
async fn test_fallback_response_still_has_message() {
    let orchestrator = orchestrator(Arc::new(FailingGenerator::transport()));
    let response = orchestrator
        .respond(request(json!({
            "blockNumber": 3,
            "accuracy": 75.0,
            "averageRT": 650.0,
            "previousBlock": { "accuracy": 75.0, "averageRT": 650.0 }
        })))
        .await
        .unwrap();

    assert!(response.fallback);
    assert!(!response.message.is_empty());
    assert_ne!(response.message, neutral_message(Language::En));
}

#[tokio::test]
async fn test_invalid_block_is_client_error() {
    let generator = Arc::new(CountingGenerator::new());
    let orchestrator = orchestrator(generator.clone());
    let err = orchestrator
        .respond(request(json!({
            "blockNumber": 0,
            "accuracy": 75.0,
            "averageRT": 650.0
        })))
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_response_round_trips_through_json() {
    let orchestrator = orchestrator(Arc::new(CountingGenerator::new()));
    let response = orchestrator
        .respond(request(json!({ "blockNumber": 1, "accuracy": 75.0, "averageRT": 650.0 })))
        .await
        .unwrap();

    let wire = serde_json::to_value(&response).unwrap();
    assert_eq!(wire["feedbackPatterns"].as_object().unwrap().len(), ScenarioKey::COUNT);
    assert_eq!(wire["cached"], false);

    let parsed: FeedbackResponse = serde_json::from_value(wire).unwrap();
    assert_eq!(parsed, response);
}
