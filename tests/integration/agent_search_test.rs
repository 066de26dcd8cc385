// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_context;
use artworkrs::utils::errors::ExtractionError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_agent_job(server: &MockServer, poll_body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v2/agent"))
        .and(body_partial_json(json!({"maxCredits": 20})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": "agent-1"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/agent/agent-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(poll_body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_agent_search_returns_raw_payload() {
    let server = MockServer::start().await;
    let works = json!({"works": [{"title": "Red Room", "url": "https://artist.example.com/works/1"}]});
    mount_agent_job(&server, json!({"status": "completed", "data": works.clone()})).await;

    let context = create_test_context(&server);
    let payload = context
        .agent_search()
        .agent_search("video works by the artist", 20)
        .await
        .unwrap();

    assert_eq!(payload, works);
}

#[tokio::test]
async fn test_agent_failure_is_typed() {
    let server = MockServer::start().await;
    mount_agent_job(&server, json!({"status": "failed", "error": "no results"})).await;

    let context = create_test_context(&server);
    let result = context.agent_search().agent_search("anything", 20).await;

    assert!(matches!(result, Err(ExtractionError::JobFailed(reason)) if reason == "no results"));
}

#[tokio::test]
async fn test_empty_prompt_is_rejected_before_submit() {
    let server = MockServer::start().await;
    let context = create_test_context(&server);

    let result = context.agent_search().agent_search("   ", 20).await;

    assert!(matches!(result, Err(ExtractionError::Config(_))));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
