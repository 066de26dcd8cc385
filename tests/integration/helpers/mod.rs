// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use artworkrs::application::context::AppContext;
use artworkrs::config::settings::Settings;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 指向模拟服务的配置：内存缓存、无等待的轮询与退避
pub fn test_settings(base_url: &str, api_key: Option<&str>) -> Settings {
    let mut settings = Settings::defaults().expect("default settings");
    settings.service.base_url = base_url.to_string();
    settings.service.api_key = api_key.map(str::to_string);
    settings.service.request_timeout_secs = 5;
    settings.rate_limiting.calls_per_minute = 60_000;
    settings.cache.backend = "memory".to_string();
    settings.polling.interval_secs = 0;
    settings.polling.single_max_wait_secs = 5;
    settings.polling.agent_max_wait_secs = 5;
    settings.retry.initial_backoff_ms = 0;
    settings
}

pub fn create_test_context(server: &MockServer) -> AppContext {
    create_test_context_with(test_settings(&server.uri(), Some("test-key")))
}

pub fn create_test_context_with(settings: Settings) -> AppContext {
    AppContext::from_settings(settings).expect("test context")
}

/// 为某个URL挂载一个抽取任务：提交返回 `job_id`，轮询返回 `poll_body`
pub async fn mount_extract_job(server: &MockServer, url: &str, job_id: &str, poll_body: Value) {
    Mock::given(method("POST"))
        .and(path("/v2/extract"))
        .and(body_partial_json(json!({"urls": [url]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": job_id})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/v2/extract/{}", job_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(poll_body))
        .mount(server)
        .await;
}

pub fn completed(data: Value) -> Value {
    json!({"status": "completed", "data": data, "creditsUsed": 1})
}
