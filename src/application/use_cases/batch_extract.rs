// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::domain::models::batch::{dedup_by_url, BatchOutcome, BatchStats, ExtractionOutcome};
use crate::domain::models::extraction_level::ExtractionLevel;
use crate::domain::models::job::JobKind;
use crate::domain::models::record::Record;
use crate::domain::services::contamination_cleaner::ContaminationCleaner;
use crate::domain::services::field_normalizer::FieldNormalizer;
use crate::infrastructure::cache::cache_store::CacheStore;
use crate::infrastructure::extraction_api::job_poller::{into_batch_records, JobPoller};
use crate::utils::errors::ExtractionError;
use crate::workers::manager::ConcurrencyManager;

// === Section: Use Case Definition ===

/// 已知URL的批量 AI 抽取
///
/// 先用抽取级别缓存分流，未命中的URL各自作为一个抽取任务，
/// 由并发管理器分发，最终与缓存结果合并、去重并清理污染。
pub struct BatchExtractUseCase {
    poller: Arc<JobPoller>,
    cache: CacheStore,
    manager: ConcurrencyManager,
    normalizer: FieldNormalizer,
    cleaner: ContaminationCleaner,
    max_items: usize,
    max_wait: Duration,
    has_credentials: bool,
}

// === Section: Implementation ===

impl BatchExtractUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        poller: Arc<JobPoller>,
        cache: CacheStore,
        manager: ConcurrencyManager,
        cleaner: ContaminationCleaner,
        max_items: usize,
        max_wait: Duration,
        has_credentials: bool,
    ) -> Self {
        Self {
            poller,
            cache,
            manager,
            normalizer: FieldNormalizer,
            cleaner,
            max_items: max_items.max(1),
            max_wait,
            has_credentials,
        }
    }

    /// 运行一个批次
    ///
    /// # 参数
    ///
    /// * `urls` - 输入URL，重复项只处理一次，超出 `max_items` 的部分被丢弃
    /// * `prompt` - 提示词，空或默认提示词时使用级别模板
    /// * `level` - 抽取级别
    ///
    /// # 返回值
    ///
    /// * `Ok(BatchOutcome)` - 合并后的记录与统计
    /// * `Err(ExtractionError)` - 没有任何记录可返回，且失败原因是凭据或配置问题
    pub async fn run_batch(
        &self,
        urls: Vec<String>,
        prompt: &str,
        level: ExtractionLevel,
    ) -> Result<BatchOutcome, ExtractionError> {
        let targets = self.select_targets(urls);
        let prompt = level.resolve_prompt(prompt);
        let mut stats = BatchStats::new(targets.len());

        let mut cached_records = Vec::new();
        let mut uncached = Vec::new();
        for url in targets {
            match self.cache.get_extraction(&url, &prompt).await {
                Some(record) => {
                    let outcome = ExtractionOutcome::Cached(record);
                    stats.count(&outcome);
                    cached_records.extend(outcome.into_record());
                }
                None => uncached.push(url),
            }
        }
        info!(
            "Batch of {} URLs: {} from cache, {} to extract ({})",
            stats.urls_found,
            cached_records.len(),
            uncached.len(),
            level
        );

        let mut fresh_records = Vec::new();
        if !uncached.is_empty() && !self.has_credentials {
            if cached_records.is_empty() {
                return Err(ExtractionError::MissingCredentials);
            }
            warn!(
                "No credentials configured, {} uncached URLs not extracted",
                uncached.len()
            );
            for _ in &uncached {
                stats.count(&ExtractionOutcome::Failed(
                    ExtractionError::MissingCredentials.to_string(),
                ));
            }
        } else if !uncached.is_empty() {
            let body_template = request_body(&prompt, level.schema());
            let poller = self.poller.clone();
            let cache = self.cache.clone();
            let max_wait = self.max_wait;
            let prompt_key = Arc::new(prompt.clone());

            let results = self
                .manager
                .run(uncached, move |url| {
                    let poller = poller.clone();
                    let cache = cache.clone();
                    let prompt_key = prompt_key.clone();
                    let mut body = body_template.clone();
                    async move {
                        body["urls"] = json!([url]);
                        extract_one(&poller, &cache, &prompt_key, &url, &body, max_wait).await
                    }
                })
                .await;

            let mut setup_error = None;
            for result in results {
                let outcome = match result.output {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => {
                        let reason = e.to_string();
                        setup_error.get_or_insert(e);
                        ExtractionOutcome::Failed(reason)
                    }
                    Err(reason) => ExtractionOutcome::Failed(reason),
                };
                if let ExtractionOutcome::Failed(reason) = &outcome {
                    warn!("Extraction of {} failed: {}", result.url, reason);
                }
                stats.count(&outcome);
                fresh_records.extend(outcome.into_record());
            }

            // 批次里什么都没拿到，而原因是凭据或配置：交给调用方处理
            if let Some(e) = setup_error {
                if cached_records.is_empty() && fresh_records.is_empty() {
                    error!("Batch aborted by setup error: {}", e);
                    return Err(e);
                }
            }
        }

        let mut data = cached_records;
        data.extend(fresh_records);
        let mut data = dedup_by_url(data);
        stats.fields_normalized = self.normalizer.normalize_all(&mut data);
        stats.contamination_cleaned = self.cleaner.clean(&mut data);

        info!(
            "Batch finished: {} extracted, {} cached, {} skipped, {} failed, {} fields cleaned",
            stats.extracted, stats.from_cache, stats.skipped, stats.failed, stats.contamination_cleaned
        );
        Ok(BatchOutcome { data, stats })
    }

    /// 去重并截断到额度预算
    fn select_targets(&self, urls: Vec<String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut targets: Vec<String> = urls
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty() && seen.insert(url.clone()))
            .collect();
        if targets.len() > self.max_items {
            warn!(
                "Batch truncated from {} to {} URLs",
                targets.len(),
                self.max_items
            );
            targets.truncate(self.max_items);
        }
        targets
    }
}

fn request_body(prompt: &str, schema: Option<Value>) -> Value {
    let mut body = json!({
        "urls": [],
        "prompt": prompt,
        "enableWebSearch": false
    });
    if let Some(schema) = schema {
        body["schema"] = schema;
    }
    body
}

/// 单URL任务：提交、轮询，再把结果转换成批次语义的记录
///
/// 只有配置类错误以 `Err` 返回，其余失败都是该URL的 `Failed`
async fn extract_one(
    poller: &JobPoller,
    cache: &CacheStore,
    prompt: &str,
    url: &str,
    body: &Value,
    max_wait: Duration,
) -> Result<ExtractionOutcome, ExtractionError> {
    let job = match poller.run(JobKind::Extract, body, max_wait).await {
        Ok(job) => job,
        Err(e) if e.is_setup_error() => return Err(e),
        Err(e) => return Ok(ExtractionOutcome::Failed(e.to_string())),
    };

    let records = into_batch_records(&job, &[url.to_string()]);
    let Some(mut record) = pick_record(records) else {
        return Ok(ExtractionOutcome::Failed("empty extraction".to_string()));
    };
    record.url = url.to_string();

    if record.is_failed() {
        return Ok(ExtractionOutcome::SoftFailed(record));
    }
    if record.is_exhibition() {
        info!("Skipping exhibition page {}", url);
        return Ok(ExtractionOutcome::Skipped);
    }
    cache.put_extraction(url, prompt, &record).await;
    Ok(ExtractionOutcome::Extracted(record))
}

/// 优先取第一条成功记录，否则取第一条软失败记录
fn pick_record(records: Vec<Record>) -> Option<Record> {
    let first_ok = records.iter().position(|r| !r.is_failed());
    let mut records = records;
    match first_ok {
        Some(index) => Some(records.swap_remove(index)),
        None => records.into_iter().next(),
    }
}
