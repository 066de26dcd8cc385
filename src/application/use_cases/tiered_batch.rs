// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::batch::{dedup_by_url, BatchOutcome, BatchStats, ExtractionOutcome};
use crate::domain::services::contamination_cleaner::ContaminationCleaner;
use crate::domain::services::field_normalizer::FieldNormalizer;
use crate::engines::tiered_extractor::TieredExtractor;
use crate::workers::manager::ConcurrencyManager;

// === Section: Use Case Definition ===

/// 分层批量抽取
///
/// 每个URL由分层抽取器独立处理（缓存命中在抽取器内部完成），
/// 结果按完成顺序收集后去重并清理污染。
pub struct TieredBatchUseCase {
    extractor: Arc<TieredExtractor>,
    manager: ConcurrencyManager,
    normalizer: FieldNormalizer,
    cleaner: ContaminationCleaner,
}

// === Section: Implementation ===

impl TieredBatchUseCase {
    pub fn new(
        extractor: Arc<TieredExtractor>,
        manager: ConcurrencyManager,
        cleaner: ContaminationCleaner,
    ) -> Self {
        Self {
            extractor,
            manager,
            normalizer: FieldNormalizer,
            cleaner,
        }
    }

    /// 在URL列表上运行分层抽取
    ///
    /// 永不返回错误：每个URL都落入 extracted / skipped / failed / from_cache 之一
    pub async fn run_tiered(&self, urls: Vec<String>) -> BatchOutcome {
        let mut seen = HashSet::new();
        let targets: Vec<String> = urls
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty() && seen.insert(url.clone()))
            .collect();

        let mut stats = BatchStats::new(targets.len());
        info!(
            "Tiered run over {} URLs with {} workers (tiers: {:?})",
            targets.len(),
            self.manager.workers(),
            self.extractor.tier_kinds()
        );

        let extractor = self.extractor.clone();
        let results = self
            .manager
            .run(targets, move |url| {
                let extractor = extractor.clone();
                async move { extractor.extract(&url).await }
            })
            .await;

        let mut records = Vec::with_capacity(results.len());
        for result in results {
            let outcome = result.output.unwrap_or_else(ExtractionOutcome::Failed);
            if let ExtractionOutcome::Failed(reason) = &outcome {
                warn!("No record for {}: {}", result.url, reason);
            }
            stats.count(&outcome);
            records.extend(outcome.into_record());
        }

        let mut data = dedup_by_url(records);
        stats.fields_normalized = self.normalizer.normalize_all(&mut data);
        stats.contamination_cleaned = self.cleaner.clean(&mut data);

        info!(
            "Tiered run finished: {} extracted, {} cached, {} skipped, {} failed",
            stats.extracted, stats.from_cache, stats.skipped, stats.failed
        );
        BatchOutcome { data, stats }
    }
}
