// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_context;
use artworkrs::infrastructure::extraction_api::link_discoverer::ScrollMode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED: &str = "https://artist.example.com/portfolio";

#[tokio::test]
async fn test_discovered_links_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"extract": {"urls": [
                "https://artist.example.com/works/1",
                "https://artist.example.com/works/2",
                "https://artist.example.com/works/1",
                "mailto:studio@example.com"
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let context = create_test_context(&server);
    let use_case = context.discover_links();

    let links = use_case.execute(SEED, ScrollMode::Horizontal, true).await.unwrap();
    assert_eq!(
        links,
        vec![
            "https://artist.example.com/works/1".to_string(),
            "https://artist.example.com/works/2".to_string()
        ]
    );

    let cached = use_case.execute(SEED, ScrollMode::Horizontal, true).await.unwrap();
    assert_eq!(cached, links);
}

#[tokio::test]
async fn test_modes_are_cached_separately_and_empty_lists_are_not() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"extract": {"urls": []}}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let context = create_test_context(&server);
    let use_case = context.discover_links();

    assert!(use_case.execute(SEED, ScrollMode::Auto, true).await.unwrap().is_empty());
    assert!(use_case.execute(SEED, ScrollMode::Auto, true).await.unwrap().is_empty());
    assert!(use_case.execute(SEED, ScrollMode::Vertical, true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scrape_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_string("renderer crashed"))
        .mount(&server)
        .await;

    let context = create_test_context(&server);
    let result = context.discover_links().execute(SEED, ScrollMode::Auto, false).await;

    assert!(result.is_err());
}
