//! End-to-end goal submission against a mock inference server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use autogoal::config::InferenceConfig;
use autogoal::inference::ERROR_MARKER;
use autogoal::ui::{App, Console};
use autogoal::{ConversationLog, InferenceClient, Role, VoiceCapability, submit_goal};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_answering(prompt: &str, reply: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"prompt": prompt})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": reply})))
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> InferenceClient {
    InferenceClient::new(&InferenceConfig {
        api_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn each_goal_adds_user_then_assistant() {
    let server = server_answering("plan a trip", "Pack light.").await;
    let client = client_for(&server);
    let mut log = ConversationLog::new();

    let exchange = submit_goal(&client, &mut log, "plan a trip").await;

    assert!(exchange.is_success());
    assert_eq!(exchange.answer(), Some("Pack light."));
    assert_eq!(log.len(), 2);
    assert_eq!(log.entries()[0].role, Role::User);
    assert_eq!(log.entries()[0].content, "plan a trip");
    assert_eq!(log.entries()[1].role, Role::Assistant);
    assert_eq!(log.entries()[1].content, "Pack light.");
}

#[tokio::test]
async fn failures_are_logged_as_marked_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "out of memory"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut log = ConversationLog::new();
    let exchange = submit_goal(&client, &mut log, "anything").await;

    assert!(!exchange.is_success());
    assert_eq!(log.len(), 2);
    let recorded = &log.entries()[1].content;
    assert!(recorded.starts_with(ERROR_MARKER));
    assert!(recorded.contains("out of memory"));
}

#[tokio::test]
async fn log_keeps_submission_order() {
    let server = MockServer::start().await;
    for (prompt, reply) in [("first", "one"), ("second", "two")] {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({"prompt": prompt})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": reply})))
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let mut log = ConversationLog::new();
    submit_goal(&client, &mut log, "first").await;
    submit_goal(&client, &mut log, "second").await;

    let contents: Vec<&str> = log.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(contents, ["first", "one", "second", "two"]);
    assert_eq!(log.exchange_count(), 2);
}

#[tokio::test]
async fn interactive_session_from_goal_file() {
    let server = server_answering("water the plants", "Done, twice a week.").await;
    let dir = tempfile::tempdir().unwrap();
    let goals = dir.path().join("goals.txt");
    std::fs::write(&goals, "water the plants\nfeed the cat\n").unwrap();

    let app = App::new(
        Box::new(client_for(&server)),
        VoiceCapability::unavailable("no microphone"),
        &goals,
    );
    let mut console = Console::new("3\n1\nq\n".as_bytes(), Vec::new());
    let mut log = ConversationLog::new();
    app.run(&mut console, &mut log).await.unwrap();

    let out = String::from_utf8(console.into_output()).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.entries()[1].content, "Done, twice a week.");
    assert!(out.contains("  2. feed the cat"));
    assert!(out.contains("🤖 Auto-GPT: Done, twice a week."));
    assert!(out.contains("🧠 You: water the plants"));
}
