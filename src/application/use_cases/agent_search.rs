// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::info;

use crate::domain::models::job::JobKind;
use crate::infrastructure::extraction_api::job_poller::{into_payload, JobPoller};
use crate::utils::errors::ExtractionError;

/// 开放搜索 Agent 任务
///
/// 没有已知URL，由服务自行搜索；完成时返回原始负载
pub struct AgentSearchUseCase {
    poller: Arc<JobPoller>,
    max_wait: Duration,
}

impl AgentSearchUseCase {
    pub fn new(poller: Arc<JobPoller>, max_wait: Duration) -> Self {
        Self { poller, max_wait }
    }

    /// 提交 Agent 任务并等待
    ///
    /// # 返回值
    ///
    /// * `Ok(Value)` - 任务完成时的原始负载
    /// * `Err(ExtractionError)` - 提交失败、任务失败、超时或空结果
    pub async fn agent_search(&self, prompt: &str, max_credits: u32) -> Result<Value, ExtractionError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ExtractionError::Config("agent prompt must not be empty".to_string()));
        }

        info!("Starting agent search (max credits: {})", max_credits);
        let body = json!({
            "prompt": prompt,
            "maxCredits": max_credits
        });
        let job = self.poller.run(JobKind::Agent, &body, self.max_wait).await?;
        into_payload(job, self.max_wait)
    }
}
