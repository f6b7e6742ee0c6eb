//! Inference client contract tests.
//!
//! Verify the `/api/generate` request shape and how every kind of server
//! reply maps onto the tagged result and its display text.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use autogoal::config::InferenceConfig;
use autogoal::inference::{
    ERROR_MARKER, EndpointStatus, InferenceClient, InferenceError, NO_RESPONSE_PLACEHOLDER,
    process_goal,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> InferenceClient {
    InferenceClient::new(&InferenceConfig {
        api_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

// ── Request format ─────────────────────────────────────────────

#[tokio::test]
async fn request_sends_model_prompt_and_no_streaming() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "model": "mistral",
            "prompt": "plan my day",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).generate("plan my day").await;
    assert_eq!(reply.unwrap(), "ok");
}

#[tokio::test]
async fn configured_model_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({"model": "llama3", "prompt": "x", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "y"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = InferenceClient::new(&InferenceConfig {
        api_url: server.uri(),
        model: "llama3".to_owned(),
        request_timeout_secs: None,
    })
    .unwrap();
    assert_eq!(client.generate("x").await.unwrap(), "y");
}

// ── Response handling ──────────────────────────────────────────

#[tokio::test]
async fn successful_response_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "mistral",
            "response": "hello",
            "done": true
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(process_goal(&client, "hi").await, "hello");
}

#[tokio::test]
async fn missing_response_field_yields_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.generate("hi").await.unwrap(), NO_RESPONSE_PLACEHOLDER);
    assert_eq!(process_goal(&client, "hi").await, NO_RESPONSE_PLACEHOLDER);
}

#[tokio::test]
async fn error_status_carries_ollama_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "model 'mistral' not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).generate("hi").await.unwrap_err();
    match err {
        InferenceError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model 'mistral' not found");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate("hi").await.unwrap_err();
    assert!(matches!(err, InferenceError::Decode(_)));
    assert!(process_goal(&client, "hi").await.starts_with(ERROR_MARKER));
}

#[tokio::test]
async fn unreachable_server_is_marked_error_string() {
    // Nothing listens on port 9 (discard) in test environments.
    let client = InferenceClient::new(&InferenceConfig {
        api_url: "http://127.0.0.1:9".to_owned(),
        ..Default::default()
    })
    .unwrap();

    let err = client.generate("hi").await.unwrap_err();
    assert!(matches!(err, InferenceError::Transport(_)));

    let text = process_goal(&client, "hi").await;
    assert!(text.starts_with(ERROR_MARKER), "got: {text}");
}

#[tokio::test]
async fn configured_timeout_is_enforced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = InferenceClient::new(&InferenceConfig {
        api_url: server.uri(),
        model: "mistral".to_owned(),
        request_timeout_secs: Some(1),
    })
    .unwrap();
    let err = client.generate("hi").await.unwrap_err();
    assert!(matches!(err, InferenceError::Transport(_)));
}

// ── Probe ──────────────────────────────────────────────────────

#[tokio::test]
async fn probe_lists_installed_models() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "mistral:latest"}, {"name": "phi3:mini"}]
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).probe().await;
    assert!(status.is_available());
    assert!(status.has_model("mistral"));
    assert!(!status.has_model("llama3"));
}

#[tokio::test]
async fn probe_reports_unhealthy_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let status = client_for(&server).probe().await;
    assert_eq!(
        status,
        EndpointStatus::Unhealthy {
            status_code: 500,
            message: "boom".to_owned()
        }
    );
}

#[tokio::test]
async fn probe_reports_not_running() {
    let client = InferenceClient::new(&InferenceConfig {
        api_url: "http://127.0.0.1:9".to_owned(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(client.probe().await, EndpointStatus::NotRunning);
}
