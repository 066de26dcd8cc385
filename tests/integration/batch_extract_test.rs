// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{completed, create_test_context, create_test_context_with, mount_extract_job, test_settings};
use artworkrs::domain::models::extraction_level::{ExtractionLevel, DEFAULT_PROMPT};
use artworkrs::utils::errors::ExtractionError;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const URL_A: &str = "https://artist.example.com/works/red-room";
const URL_B: &str = "https://artist.example.com/works/blue-hour";
const URL_C: &str = "https://artist.example.com/works/green-field";

#[tokio::test]
async fn test_batch_extracts_then_serves_from_cache() {
    let server = MockServer::start().await;
    mount_extract_job(
        &server,
        URL_A,
        "job-a",
        completed(json!({"title": "Red Room / 红房间", "year": 2019, "type": "Installation"})),
    )
    .await;
    mount_extract_job(
        &server,
        URL_B,
        "job-b",
        completed(json!([{"title": "Blue Hour", "year": "2021", "category": "Painting"}])),
    )
    .await;

    let context = create_test_context(&server);
    let use_case = context.batch_extract();
    let urls = vec![URL_A.to_string(), URL_B.to_string(), URL_A.to_string()];

    let first = use_case
        .run_batch(urls.clone(), DEFAULT_PROMPT, ExtractionLevel::Full)
        .await
        .unwrap();

    assert_eq!(first.stats.urls_found, 2);
    assert_eq!(first.stats.extracted, 2);
    assert_eq!(first.stats.accounted(), first.stats.urls_found);
    let red = first.data.iter().find(|r| r.url == URL_A).unwrap();
    assert_eq!(red.title, "Red Room");
    assert_eq!(red.title_cn, "红房间");
    assert_eq!(red.year, "2019");

    let submits_before = submit_count(&server).await;
    let second = use_case
        .run_batch(urls, DEFAULT_PROMPT, ExtractionLevel::Full)
        .await
        .unwrap();

    assert_eq!(second.stats.from_cache, 2);
    assert_eq!(second.stats.extracted, 0);
    assert_eq!(second.data.len(), 2);
    assert_eq!(submit_count(&server).await, submits_before);
}

#[tokio::test]
async fn test_failed_job_becomes_annotated_record() {
    let server = MockServer::start().await;
    mount_extract_job(
        &server,
        URL_A,
        "job-ok",
        completed(json!({"title": "Red Room", "year": "2019"})),
    )
    .await;
    mount_extract_job(
        &server,
        URL_B,
        "job-bad",
        json!({"status": "failed", "error": "page blocked"}),
    )
    .await;

    let context = create_test_context(&server);
    let outcome = context
        .batch_extract()
        .run_batch(
            vec![URL_A.to_string(), URL_B.to_string()],
            "title and year only",
            ExtractionLevel::Custom,
        )
        .await
        .unwrap();

    assert_eq!(outcome.stats.extracted, 1);
    assert_eq!(outcome.stats.failed, 1);
    let failed = outcome.data.iter().find(|r| r.url == URL_B).unwrap();
    assert_eq!(failed.error.as_deref(), Some("page blocked"));
}

#[tokio::test]
async fn test_exhibition_pages_are_skipped() {
    let server = MockServer::start().await;
    mount_extract_job(
        &server,
        URL_A,
        "job-show",
        completed(json!({"title": "Solo Show 2020", "year": "2020", "type": "Exhibition"})),
    )
    .await;

    let context = create_test_context(&server);
    let outcome = context
        .batch_extract()
        .run_batch(vec![URL_A.to_string()], "", ExtractionLevel::Quick)
        .await
        .unwrap();

    assert_eq!(outcome.stats.skipped, 1);
    assert!(outcome.data.is_empty());
}

#[tokio::test]
async fn test_missing_credentials_without_cache_is_an_error() {
    let server = MockServer::start().await;
    let context = create_test_context_with(test_settings(&server.uri(), None));

    let result = context
        .batch_extract()
        .run_batch(vec![URL_A.to_string()], DEFAULT_PROMPT, ExtractionLevel::Custom)
        .await;

    assert!(matches!(result, Err(ExtractionError::MissingCredentials)));
    assert_eq!(submit_count(&server).await, 0);
}

#[tokio::test]
async fn test_batch_is_capped_at_max_items() {
    let server = MockServer::start().await;
    for (url, id) in [(URL_A, "job-a"), (URL_B, "job-b"), (URL_C, "job-c")] {
        mount_extract_job(&server, url, id, completed(json!({"title": id, "year": "2018"}))).await;
    }

    let mut settings = test_settings(&server.uri(), Some("test-key"));
    settings.concurrency.max_batch_items = 2;
    let context = create_test_context_with(settings);

    let outcome = context
        .batch_extract()
        .run_batch(
            vec![URL_A.to_string(), URL_B.to_string(), URL_C.to_string()],
            DEFAULT_PROMPT,
            ExtractionLevel::Custom,
        )
        .await
        .unwrap();

    assert_eq!(outcome.stats.urls_found, 2);
    assert!(outcome.data.iter().all(|r| r.url != URL_C));
    assert_eq!(submit_count(&server).await, 2);
}

#[tokio::test]
async fn test_shared_materials_are_cleaned_across_batch() {
    let server = MockServer::start().await;
    let shared = "Bronze, steel cable and reclaimed timber";
    let items = [
        (URL_A, "job-a", "Red Room", "A room painted entirely red, where visitors lose their sense of depth."),
        (URL_B, "job-b", "Blue Hour", "Twelve screens record the light of dusk over a harbour in real time."),
        (URL_C, "job-c", "Green Field", "A planted field inside the gallery grows for the length of the show."),
    ];
    for (url, id, title, description) in items {
        mount_extract_job(
            &server,
            url,
            id,
            completed(json!({
                "title": title,
                "year": "2022",
                "materials": shared,
                "description_en": description
            })),
        )
        .await;
    }

    let context = create_test_context(&server);
    let outcome = context
        .batch_extract()
        .run_batch(
            vec![URL_A.to_string(), URL_B.to_string(), URL_C.to_string()],
            DEFAULT_PROMPT,
            ExtractionLevel::Full,
        )
        .await
        .unwrap();

    assert_eq!(outcome.stats.extracted, 3);
    assert_eq!(outcome.stats.contamination_cleaned, 2);
    let kept: Vec<_> = outcome.data.iter().filter(|r| r.materials == shared).collect();
    assert_eq!(kept.len(), 1);
}

#[tokio::test]
async fn test_rejected_submit_fails_only_that_url() {
    let server = MockServer::start().await;
    mount_extract_job(
        &server,
        URL_A,
        "job-a",
        completed(json!({"title": "Red Room", "year": "2019"})),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v2/extract"))
        .respond_with(ResponseTemplate::new(402).set_body_string("insufficient credits"))
        .mount(&server)
        .await;

    let context = create_test_context(&server);
    let outcome = context
        .batch_extract()
        .run_batch(
            vec![URL_A.to_string(), URL_B.to_string()],
            DEFAULT_PROMPT,
            ExtractionLevel::Custom,
        )
        .await
        .unwrap();

    assert_eq!(outcome.stats.extracted, 1);
    assert_eq!(outcome.stats.failed, 1);
    assert_eq!(outcome.data.len(), 1);
}

#[tokio::test]
async fn test_rejected_api_key_aborts_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/extract"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let context = create_test_context(&server);
    let result = context
        .batch_extract()
        .run_batch(
            vec![URL_A.to_string(), URL_B.to_string()],
            DEFAULT_PROMPT,
            ExtractionLevel::Custom,
        )
        .await;

    assert!(matches!(
        result,
        Err(ExtractionError::SubmitFailure { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_rejected_api_key_keeps_partial_batch() {
    let server = MockServer::start().await;
    mount_extract_job(
        &server,
        URL_A,
        "job-a",
        completed(json!({"title": "Red Room", "year": "2019"})),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v2/extract"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let context = create_test_context(&server);
    let outcome = context
        .batch_extract()
        .run_batch(
            vec![URL_A.to_string(), URL_B.to_string()],
            DEFAULT_PROMPT,
            ExtractionLevel::Custom,
        )
        .await
        .unwrap();

    assert_eq!(outcome.stats.extracted, 1);
    assert_eq!(outcome.stats.failed, 1);
}

async fn submit_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.to_string() == "POST" && r.url.path() == "/v2/extract")
        .count()
}
