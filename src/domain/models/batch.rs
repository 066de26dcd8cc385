// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::models::record::Record;

/// 单个URL的抽取结果
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// 本次新抽取得到的记录
    Extracted(Record),
    /// 直接命中缓存
    Cached(Record),
    /// 被识别为展览/画册而过滤
    Skipped,
    /// 失败，不产生记录
    Failed(String),
    /// 失败，但保留一条带错误标注的记录
    SoftFailed(Record),
}

impl ExtractionOutcome {
    /// 结果中携带的记录
    pub fn record(&self) -> Option<&Record> {
        match self {
            ExtractionOutcome::Extracted(r)
            | ExtractionOutcome::Cached(r)
            | ExtractionOutcome::SoftFailed(r) => Some(r),
            ExtractionOutcome::Skipped | ExtractionOutcome::Failed(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            ExtractionOutcome::Extracted(r)
            | ExtractionOutcome::Cached(r)
            | ExtractionOutcome::SoftFailed(r) => Some(r),
            ExtractionOutcome::Skipped | ExtractionOutcome::Failed(_) => None,
        }
    }
}

/// 批次统计
///
/// 每个输入URL恰好落入 extracted / skipped / failed / from_cache 之一。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub urls_found: usize,
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub from_cache: usize,
    #[serde(default)]
    pub fields_normalized: usize,
    pub contamination_cleaned: usize,
}

impl BatchStats {
    pub fn new(urls_found: usize) -> Self {
        Self {
            urls_found,
            ..Default::default()
        }
    }

    /// 按结果类型计数
    pub fn count(&mut self, outcome: &ExtractionOutcome) {
        match outcome {
            ExtractionOutcome::Extracted(_) => self.extracted += 1,
            ExtractionOutcome::Cached(_) => self.from_cache += 1,
            ExtractionOutcome::Skipped => self.skipped += 1,
            ExtractionOutcome::Failed(_) | ExtractionOutcome::SoftFailed(_) => self.failed += 1,
        }
    }

    /// 已归类的URL数
    pub fn accounted(&self) -> usize {
        self.extracted + self.skipped + self.failed + self.from_cache
    }
}

/// 批次最终结果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub data: Vec<Record>,
    pub stats: BatchStats,
}

/// 按URL去重，保留首次出现的记录
pub fn dedup_by_url(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut first = Record::new("https://example.com/a");
        first.title = "first".to_string();
        let mut second = Record::new("https://example.com/a");
        second.title = "second".to_string();
        let other = Record::new("https://example.com/b");

        let deduped = dedup_by_url(vec![first, second, other]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "first");
    }

    #[test]
    fn test_stats_buckets() {
        let mut stats = BatchStats::new(4);
        stats.count(&ExtractionOutcome::Extracted(Record::new("a")));
        stats.count(&ExtractionOutcome::Cached(Record::new("b")));
        stats.count(&ExtractionOutcome::Skipped);
        stats.count(&ExtractionOutcome::SoftFailed(Record::failed("d", "x")));

        assert_eq!(stats.accounted(), stats.urls_found);
        assert_eq!(stats.failed, 1);
    }
}
