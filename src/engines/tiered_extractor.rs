// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::models::batch::ExtractionOutcome;
use crate::domain::models::record::Record;
use crate::domain::services::completeness::CompletenessPolicy;
use crate::engines::traits::{ExtractionTier, TierKind};
use crate::infrastructure::cache::cache_store::CacheStore;

/// 分层抽取器
///
/// 按成本从低到高依次尝试各层，每层结果只填补仍为空的字段，
/// 一旦满足完整性策略就接受并写入缓存。
pub struct TieredExtractor {
    /// 层列表（按顺序尝试）
    tiers: Vec<Arc<dyn ExtractionTier>>,
    /// 缓存
    cache: CacheStore,
    /// 完整性策略
    policy: CompletenessPolicy,
}

impl TieredExtractor {
    /// 创建新的分层抽取器
    ///
    /// # 参数
    ///
    /// * `tiers` - 按成本排序的层列表
    /// * `cache` - 最终记录缓存
    pub fn new(tiers: Vec<Arc<dyn ExtractionTier>>, cache: CacheStore) -> Self {
        Self {
            tiers,
            cache,
            policy: CompletenessPolicy,
        }
    }

    pub fn tier_kinds(&self) -> Vec<TierKind> {
        self.tiers.iter().map(|tier| tier.kind()).collect()
    }

    /// 抽取单个URL
    ///
    /// 永不返回错误：单个URL的失败表现为 `Failed`，展览/画册页面为 `Skipped`
    pub async fn extract(&self, url: &str) -> ExtractionOutcome {
        if let Some(record) = self.cache.get_record(url).await {
            debug!("Cache hit for {}", url);
            return ExtractionOutcome::Cached(record);
        }

        let start_time = Instant::now();
        let mut merged = Record::new(url);
        let mut last_error: Option<String> = None;
        let mut final_tier_succeeded = false;

        for tier in &self.tiers {
            let tier_start = Instant::now();
            final_tier_succeeded = false;
            match tier.extract(url, &merged).await {
                Ok(Some(found)) => {
                    final_tier_succeeded = true;
                    let filled = merged.fill_empty_from(&found);
                    debug!(
                        "Tier {} filled {} fields for {} in {:?}",
                        tier.name(),
                        filled,
                        url,
                        tier_start.elapsed()
                    );
                }
                Ok(None) => {
                    final_tier_succeeded = true;
                    debug!("Tier {} had no contribution for {}", tier.name(), url);
                }
                Err(e) if tier.kind() == TierKind::Ai => {
                    // 付费层失败即该URL失败，较便宜层的部分结果不算数
                    let reason = format!("{} tier: {}", tier.name(), e);
                    warn!("Tier {} failed for {}: {}", tier.name(), url, e);
                    metrics::counter!("extraction_tier_failed_total", "tier" => tier.kind().label())
                        .increment(1);
                    return ExtractionOutcome::Failed(reason);
                }
                Err(e) => {
                    debug!("Tier {} failed for {}, degrading: {}", tier.name(), url, e);
                    last_error = Some(format!("{} tier: {}", tier.name(), e));
                }
            }

            merged.split_bilingual_title();

            if merged.is_exhibition() {
                info!("Skipping {}: classified as '{}'", url, merged.category);
                return ExtractionOutcome::Skipped;
            }

            if self.policy.is_complete(&merged) {
                info!(
                    "Accepted {} at tier {} (total time: {:?})",
                    url,
                    tier.name(),
                    start_time.elapsed()
                );
                metrics::counter!("extraction_tier_accepted_total", "tier" => tier.kind().label())
                    .increment(1);
                self.cache.put_record(&merged).await;
                return ExtractionOutcome::Extracted(merged);
            }
        }

        // 最后一层成功返回但仍不完整：这是能拿到的最好结果
        if final_tier_succeeded && !merged.title.trim().is_empty() {
            info!("Accepting partial record for {} after all tiers", url);
            metrics::counter!("extraction_tier_accepted_total", "tier" => "partial").increment(1);
            self.cache.put_record(&merged).await;
            return ExtractionOutcome::Extracted(merged);
        }

        let reason = last_error.unwrap_or_else(|| "no tier produced a usable record".to_string());
        warn!("All tiers failed for {}: {}", url, reason);
        ExtractionOutcome::Failed(reason)
    }
}

#[cfg(test)]
#[path = "tiered_extractor_test.rs"]
mod tests;
