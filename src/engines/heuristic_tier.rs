// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::models::record::Record;
use crate::domain::services::heuristics;
use crate::engines::traits::{ExtractionTier, SnapshotSource, TierError, TierKind};
use crate::infrastructure::extraction_api::client::ExtractionApi;
use crate::infrastructure::rate_limiter::RateLimiter;

/// 通过抽取服务获取 markdown 快照
///
/// 快照同样按次计费，因此也经过速率限制器
pub struct ServiceSnapshotSource {
    api: Arc<dyn ExtractionApi>,
    rate_limiter: Arc<RateLimiter>,
}

impl ServiceSnapshotSource {
    pub fn new(api: Arc<dyn ExtractionApi>, rate_limiter: Arc<RateLimiter>) -> Self {
        Self { api, rate_limiter }
    }
}

#[async_trait]
impl SnapshotSource for ServiceSnapshotSource {
    async fn markdown(&self, url: &str) -> Result<String, TierError> {
        self.rate_limiter.wait().await;
        let data = self
            .api
            .scrape(&json!({
                "url": url,
                "formats": ["markdown"],
                "onlyMainContent": true
            }))
            .await?;

        data.get("markdown")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| TierError::Other("snapshot without markdown".to_string()))
    }
}

/// 第二层：一次快照，用文本规则补全仍为空的字段
pub struct HeuristicTier {
    snapshots: Arc<dyn SnapshotSource>,
}

impl HeuristicTier {
    pub fn new(snapshots: Arc<dyn SnapshotSource>) -> Self {
        Self { snapshots }
    }
}

#[async_trait]
impl ExtractionTier for HeuristicTier {
    async fn extract(&self, url: &str, _partial: &Record) -> Result<Option<Record>, TierError> {
        let markdown = self.snapshots.markdown(url).await?;
        let mut record = heuristics::parse_markdown(&markdown);
        if record.has_no_content() {
            return Ok(None);
        }
        record.url = url.to_string();
        Ok(Some(record))
    }

    fn kind(&self) -> TierKind {
        TierKind::Heuristic
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}
