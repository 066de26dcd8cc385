// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{completed, create_test_context, mount_extract_job};
use artworkrs::domain::models::extraction_level::ExtractionLevel;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETE_PAGE: &str = r#"<html><head><title>Studio</title></head><body>
<h1>Red Room / 红房间</h1>
<span class="category">Installation</span>
<p>2019</p>
<img src_o="/media/red-room-large.jpg" src="/media/red-room-small.jpg">
</body></html>"#;

const TITLE_ONLY_PAGE: &str = r#"<html><body><h1>Blue Hour</h1><p>Oil on linen</p></body></html>"#;

const EXHIBITION_PAGE: &str = r#"<html><body>
<h1>Solo Show</h1><span class="category">Exhibition</span><p>2020</p>
</body></html>"#;

async fn serve_page(server: &MockServer, page_path: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.as_bytes().to_vec(), "text/html"))
        .mount(server)
        .await;
}

fn calls_to(requests: &[wiremock::Request], endpoint: &str) -> usize {
    requests.iter().filter(|r| r.url.path() == endpoint).count()
}

#[tokio::test]
async fn test_local_tier_completes_without_paid_calls() {
    let server = MockServer::start().await;
    serve_page(&server, "/works/red-room", COMPLETE_PAGE).await;
    let url = format!("{}/works/red-room", server.uri());

    let context = create_test_context(&server);
    let use_case = context.tiered_batch(ExtractionLevel::Full, "");
    let outcome = use_case.run_tiered(vec![url.clone()]).await;

    assert_eq!(outcome.stats.extracted, 1);
    let record = &outcome.data[0];
    assert_eq!(record.title, "Red Room");
    assert_eq!(record.title_cn, "红房间");
    assert_eq!(record.year, "2019");
    assert_eq!(record.images, vec![format!("{}/media/red-room-large.jpg", server.uri())]);

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(calls_to(&requests, "/v2/scrape"), 0);
    assert_eq!(calls_to(&requests, "/v2/extract"), 0);

    // 第二次直接命中缓存，不再获取页面
    let again = use_case.run_tiered(vec![url]).await;
    assert_eq!(again.stats.from_cache, 1);
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(calls_to(&requests, "/works/red-room"), 1);
}

#[tokio::test]
async fn test_heuristic_tier_fills_missing_year() {
    let server = MockServer::start().await;
    serve_page(&server, "/works/blue-hour", TITLE_ONLY_PAGE).await;
    Mock::given(method("POST"))
        .and(path("/v2/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"markdown": "# Blue Hour\n\nPainting\n\n2021\n\nOil on linen"}
        })))
        .mount(&server)
        .await;
    let url = format!("{}/works/blue-hour", server.uri());

    let context = create_test_context(&server);
    let outcome = context
        .tiered_batch(ExtractionLevel::Full, "")
        .run_tiered(vec![url])
        .await;

    assert_eq!(outcome.stats.extracted, 1);
    assert_eq!(outcome.data[0].title, "Blue Hour");
    assert_eq!(outcome.data[0].year, "2021");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(calls_to(&requests, "/v2/extract"), 0);
}

#[tokio::test]
async fn test_ai_tier_runs_when_cheaper_tiers_fall_short() {
    let server = MockServer::start().await;
    let url = format!("{}/works/green-field", server.uri());
    mount_extract_job(
        &server,
        &url,
        "job-green",
        completed(json!({"title": "Green Field", "year": "2023", "type": "Installation"})),
    )
    .await;

    let context = create_test_context(&server);
    let outcome = context
        .tiered_batch(ExtractionLevel::Full, "")
        .run_tiered(vec![url.clone()])
        .await;

    assert_eq!(outcome.stats.extracted, 1);
    assert_eq!(outcome.data[0].url, url);
    assert_eq!(outcome.data[0].title, "Green Field");
}

#[tokio::test]
async fn test_every_url_lands_in_exactly_one_bucket() {
    let server = MockServer::start().await;
    serve_page(&server, "/works/red-room", COMPLETE_PAGE).await;
    serve_page(&server, "/works/show", EXHIBITION_PAGE).await;
    let urls = vec![
        format!("{}/works/red-room", server.uri()),
        format!("{}/works/show", server.uri()),
        format!("{}/works/missing", server.uri()),
    ];

    let context = create_test_context(&server);
    let outcome = context
        .tiered_batch(ExtractionLevel::Quick, "")
        .run_tiered(urls)
        .await;

    assert_eq!(outcome.stats.urls_found, 3);
    assert_eq!(outcome.stats.extracted, 1);
    assert_eq!(outcome.stats.skipped, 1);
    assert_eq!(outcome.stats.failed, 1);
    assert_eq!(outcome.stats.accounted(), 3);
    assert_eq!(outcome.data.len(), 1);
}
