use std::sync::Arc;

use serde_json::{Value, json};

use super::ErrorBody;
use crate::llm::types::{LlmError, Message};
use crate::routes::app;
use crate::services::bridge::DEFAULT_SYSTEM_PROMPT;
use crate::services::gateway::{HEALTH_MODEL, HEALTH_PROMPT};
use crate::state::test_helpers::{MockLlm, TEST_MODEL, test_app_state};

/// Serve the router on an ephemeral port and return its base URL.
async fn spawn_app(llm: Arc<MockLlm>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let router = app(test_app_state(llm));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn health_returns_result_envelope() {
    let llm = Arc::new(MockLlm::replying("Arr!"));
    let base = spawn_app(llm.clone()).await;

    let resp = client().get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "result": "Arr!" }));

    let call = &llm.calls()[0];
    assert_eq!(call.model, HEALTH_MODEL);
    assert_eq!(call.messages, vec![Message::user(HEALTH_PROMPT)]);
}

#[tokio::test]
async fn chat_returns_response_envelope() {
    let llm = Arc::new(MockLlm::replying("C received"));
    let base = spawn_app(llm.clone()).await;

    let resp = client()
        .post(format!("{base}/chat"))
        .json(&json!({
            "messages": [
                { "role": "user", "content": "A" },
                { "role": "assistant", "content": "B" },
                { "role": "user", "content": "C" }
            ],
            "settings": { "web_search": true, "image_generation": true, "data_analysis": true, "think": false },
            "session_id": "0b6a6c5e-4f1e-4c55-9a55-5d3b1f0f9c11"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "response": "C received" }));

    let call = &llm.calls()[0];
    assert_eq!(call.messages, vec![Message::user("C")]);
    assert_eq!(call.system, DEFAULT_SYSTEM_PROMPT);
    assert_eq!(call.model, TEST_MODEL);
}

#[tokio::test]
async fn chat_message_only_forwards_fields() {
    let llm = Arc::new(MockLlm::replying("pong"));
    let base = spawn_app(llm.clone()).await;

    let resp = client()
        .post(format!("{base}/chat_messageonly"))
        .json(&json!({ "prompt": "ping", "system_prompt": "Reply with pong.", "model": "gpt-4o-mini" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "response": "pong" }));

    let call = &llm.calls()[0];
    assert_eq!(call.model, "gpt-4o-mini");
    assert_eq!(call.system, "Reply with pong.");
    assert_eq!(call.messages, vec![Message::user("ping")]);
}

#[tokio::test]
async fn chat_message_only_blank_model_uses_default() {
    let llm = Arc::new(MockLlm::replying("ok"));
    let base = spawn_app(llm.clone()).await;

    client()
        .post(format!("{base}/chat_messageonly"))
        .json(&json!({ "prompt": "hi", "model": "" }))
        .send()
        .await
        .unwrap();

    let call = &llm.calls()[0];
    assert_eq!(call.model, TEST_MODEL);
    assert_eq!(call.system, "");
}

#[tokio::test]
async fn gateway_failure_maps_to_bad_gateway() {
    let llm = Arc::new(MockLlm::failing(LlmError::ApiRequest("connection refused".into())));
    let base = spawn_app(llm).await;

    let resp = client()
        .post(format!("{base}/chat"))
        .json(&json!({ "messages": [{ "role": "user", "content": "Hi" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.kind, "E_API_REQUEST");
    assert!(body.error.contains("connection refused"));
    assert!(body.retryable);
}

#[tokio::test]
async fn malformed_chat_body_is_rejected_without_calling_llm() {
    let llm = Arc::new(MockLlm::replying("unused"));
    let base = spawn_app(llm.clone()).await;

    let resp = client()
        .post(format!("{base}/chat"))
        .json(&json!({ "settings": {} }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    assert!(llm.calls().is_empty());
}
