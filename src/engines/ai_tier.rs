// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::extraction_level::ExtractionLevel;
use crate::domain::models::job::JobKind;
use crate::domain::models::record::Record;
use crate::engines::traits::{ExtractionTier, TierError, TierKind};
use crate::infrastructure::extraction_api::job_poller::{into_single_record, JobPoller};

/// 第三层：schema 引导的 AI 抽取任务
pub struct AiTier {
    poller: Arc<JobPoller>,
    prompt: String,
    schema: Option<Value>,
    max_wait: Duration,
}

impl AiTier {
    pub fn new(poller: Arc<JobPoller>, level: ExtractionLevel, prompt: &str, max_wait: Duration) -> Self {
        Self {
            poller,
            prompt: level.resolve_prompt(prompt),
            schema: level.schema(),
            max_wait,
        }
    }

    fn request_body(&self, url: &str) -> Value {
        let mut body = json!({
            "urls": [url],
            "prompt": self.prompt,
            "enableWebSearch": false
        });
        if let Some(schema) = &self.schema {
            body["schema"] = schema.clone();
        }
        body
    }
}

#[async_trait]
impl ExtractionTier for AiTier {
    async fn extract(&self, url: &str, _partial: &Record) -> Result<Option<Record>, TierError> {
        let job = self
            .poller
            .run(JobKind::Extract, &self.request_body(url), self.max_wait)
            .await?;
        let record = into_single_record(job, url, self.max_wait)?;
        Ok(Some(record))
    }

    fn kind(&self) -> TierKind {
        TierKind::Ai
    }

    fn name(&self) -> &'static str {
        "ai"
    }
}
