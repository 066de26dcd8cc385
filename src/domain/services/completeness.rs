// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::Record;

/// 表示时间型媒体的类别关键词
const TIME_BASED_KEYWORDS: &[&str] = &[
    "video",
    "film",
    "animation",
    "performance",
    "sound",
    "audio",
    "录像",
    "视频",
    "影像",
    "动画",
    "表演",
    "声音",
];

/// 完整性策略
///
/// 标题和年份必须存在；类别是时间型媒体时还需要时长
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessPolicy;

impl CompletenessPolicy {
    pub fn is_complete(&self, record: &Record) -> bool {
        if record.title.trim().is_empty() || record.year.trim().is_empty() {
            return false;
        }
        !is_time_based(&record.category) || !record.duration.trim().is_empty()
    }
}

/// 类别是否意味着时间型媒体
pub fn is_time_based(category: &str) -> bool {
    let category = category.to_lowercase();
    TIME_BASED_KEYWORDS.iter().any(|kw| category.contains(kw))
}
