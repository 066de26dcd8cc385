// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

use crate::domain::models::job::{ExtractionJob, JobKind, JobStatus};
use crate::domain::models::record::Record;
use crate::infrastructure::extraction_api::client::{ExtractionApi, SubmitResponse};
use crate::infrastructure::rate_limiter::RateLimiter;
use crate::utils::errors::ExtractionError;
use crate::utils::retry_policy::RetryPolicy;

/// 异步任务的提交/轮询协议
///
/// 提交前经过速率限制器；HTTP 429 按重试策略指数退避。
/// 拿到任务ID后按固定间隔轮询，直到完成、失败或等待预算耗尽。
pub struct JobPoller {
    api: Arc<dyn ExtractionApi>,
    rate_limiter: Arc<RateLimiter>,
    retry_policy: RetryPolicy,
    poll_interval: Duration,
}

impl JobPoller {
    pub fn new(
        api: Arc<dyn ExtractionApi>,
        rate_limiter: Arc<RateLimiter>,
        retry_policy: RetryPolicy,
        poll_interval: Duration,
    ) -> Self {
        Self {
            api,
            rate_limiter,
            retry_policy,
            poll_interval,
        }
    }

    /// 提交任务
    ///
    /// # 返回值
    ///
    /// * `Ok(ExtractionJob)` - 已提交（待轮询）或已同步完成的任务
    /// * `Err(ExtractionError)` - 限流重试耗尽、提交被拒或传输错误
    pub async fn submit(&self, kind: JobKind, body: &Value) -> Result<ExtractionJob, ExtractionError> {
        let mut retries = 0;
        loop {
            self.rate_limiter.wait().await;

            match self.api.submit(kind, body).await {
                Ok(SubmitResponse::Accepted { id }) => {
                    info!("Submitted {:?} job {}", kind, id);
                    return Ok(ExtractionJob::submitted(kind, id));
                }
                Ok(SubmitResponse::Completed(data)) => {
                    info!("{:?} job completed inline", kind);
                    return Ok(ExtractionJob::completed_inline(kind, data));
                }
                Err(e) if e.is_rate_limited() => {
                    metrics::counter!("extraction_rate_limited_total").increment(1);
                    if !self.retry_policy.should_retry(retries) {
                        error!("Rate limit retries exhausted after {} attempts", retries + 1);
                        return Err(e);
                    }
                    retries += 1;
                    let backoff = self.retry_policy.calculate_backoff(retries);
                    warn!("Rate limited, retrying in {:?} ({}/{})", backoff, retries, self.retry_policy.max_retries);
                    sleep(backoff).await;
                }
                Err(e) => {
                    error!("Submit of {:?} job failed: {}", kind, e);
                    return Err(e);
                }
            }
        }
    }

    /// 轮询直到终止状态或超过 `max_wait`
    ///
    /// 单次轮询出错只记录日志并继续，总等待时间由 `max_wait` 限定
    pub async fn wait_for(&self, mut job: ExtractionJob, max_wait: Duration) -> ExtractionJob {
        let Some(id) = job.id.clone() else {
            record_terminal(&job);
            return job;
        };

        let started = Instant::now();
        while !job.status.is_terminal() {
            if started.elapsed() + self.poll_interval > max_wait {
                warn!("Job {} did not finish within {:?}", id, max_wait);
                job.mark_timeout();
                break;
            }
            sleep(self.poll_interval).await;

            match self.api.poll(job.kind, &id).await {
                Ok(response) => {
                    job.apply_poll(
                        response.status,
                        response.data,
                        response.credits_used,
                        response.error,
                    );
                    if !job.status.is_terminal() {
                        info!("Job {} still {} ({:?})", id, job.status.label(), started.elapsed());
                    }
                }
                Err(e) => warn!("Poll for job {} failed: {}", id, e),
            }
        }

        match job.status {
            JobStatus::Completed => info!(
                "Job {} completed (credits: {})",
                id,
                job.credits_used
                    .as_ref()
                    .map(serde_json::Value::to_string)
                    .unwrap_or_else(|| "N/A".to_string())
            ),
            JobStatus::Failed => error!(
                "Job {} failed: {}",
                id,
                job.failure.as_deref().unwrap_or("unknown")
            ),
            _ => {}
        }
        record_terminal(&job);
        job
    }

    /// 提交并等待
    pub async fn run(
        &self,
        kind: JobKind,
        body: &Value,
        max_wait: Duration,
    ) -> Result<ExtractionJob, ExtractionError> {
        let job = self.submit(kind, body).await?;
        Ok(self.wait_for(job, max_wait).await)
    }
}

fn record_terminal(job: &ExtractionJob) {
    metrics::counter!("extraction_jobs_total", "status" => job.status.label()).increment(1);
}

/// 单次调用语义：完成则返回原始负载，否则返回类型化错误
pub fn into_payload(job: ExtractionJob, max_wait: Duration) -> Result<Value, ExtractionError> {
    match job.status {
        JobStatus::Completed => match job.payload {
            Some(Value::Null) | None => Err(ExtractionError::EmptyExtraction),
            Some(payload) => Ok(payload),
        },
        JobStatus::Failed => Err(ExtractionError::JobFailed(
            job.failure.unwrap_or_else(|| "job failed".to_string()),
        )),
        _ => Err(ExtractionError::JobTimeout(max_wait)),
    }
}

/// 单URL语义：取第一个有信息量的条目，没有则是空抽取
pub fn into_single_record(
    job: ExtractionJob,
    url: &str,
    max_wait: Duration,
) -> Result<Record, ExtractionError> {
    let payload = into_payload(job, max_wait)?;
    let items = match payload {
        Value::Array(items) => items,
        other => vec![other],
    };
    items
        .iter()
        .map(|item| Record::from_service_item(item, Some(url)))
        .find(Record::is_informative)
        .map(|mut record| {
            record.url = url.to_string();
            record
        })
        .ok_or(ExtractionError::EmptyExtraction)
}

/// 批次语义：失败/超时/空条目都转为带错误标注的记录，永不返回错误
///
/// 服务返回的条目通过 URL 对应回输入；没有 URL 的条目按位置对应。
pub fn into_batch_records(job: &ExtractionJob, urls: &[String]) -> Vec<Record> {
    match job.status {
        JobStatus::Completed => {
            let items = job.payload_items();
            if items.is_empty() {
                return urls
                    .iter()
                    .map(|url| Record::failed(url.as_str(), "empty extraction"))
                    .collect();
            }
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let fallback = urls.get(index).map(String::as_str);
                    let record = Record::from_service_item(item, fallback);
                    if record.is_informative() {
                        record
                    } else {
                        Record::failed(record.url, "empty extraction")
                    }
                })
                .collect()
        }
        JobStatus::Failed => {
            let reason = job.failure.clone().unwrap_or_else(|| "job failed".to_string());
            urls.iter()
                .map(|url| Record::failed(url.as_str(), reason.clone()))
                .collect()
        }
        _ => urls
            .iter()
            .map(|url| Record::failed(url.as_str(), "job timed out"))
            .collect(),
    }
}

#[cfg(test)]
#[path = "job_poller_test.rs"]
mod tests;
