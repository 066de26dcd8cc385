// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::settings::ContaminationSettings;
use crate::domain::models::record::Record;

/// 可能被污染的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Materials,
    DescriptionEn,
    DescriptionCn,
}

impl Field {
    fn get(self, record: &Record) -> &str {
        match self {
            Field::Materials => &record.materials,
            Field::DescriptionEn => &record.description_en,
            Field::DescriptionCn => &record.description_cn,
        }
    }

    fn clear(self, record: &mut Record) {
        match self {
            Field::Materials => record.materials.clear(),
            Field::DescriptionEn => record.description_en.clear(),
            Field::DescriptionCn => record.description_cn.clear(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Field::Materials => "materials",
            Field::DescriptionEn => "description_en",
            Field::DescriptionCn => "description_cn",
        }
    }
}

/// 跨记录污染清理器
///
/// 批次中多条不相关记录共享同一段长文本时，只保留最可能是原主的那一条，
/// 其余记录上的该字段被清空。
#[derive(Debug, Clone)]
pub struct ContaminationCleaner {
    settings: ContaminationSettings,
}

impl Default for ContaminationCleaner {
    fn default() -> Self {
        Self::new(ContaminationSettings {
            materials_min_len: 15,
            materials_min_group: 3,
            description_min_len: 30,
            description_min_group: 2,
            unique_description_min_len: 50,
            title_token_min_len: 3,
            title_min_len: 2,
            unique_description_weight: 10,
            title_token_weight: 5,
            title_match_weight: 10,
            slug_match_weight: 8,
            unique_materials_weight: 5,
        })
    }
}

impl ContaminationCleaner {
    pub fn new(settings: ContaminationSettings) -> Self {
        Self { settings }
    }

    /// 清理一个批次，返回被清空的字段数
    pub fn clean(&self, records: &mut [Record]) -> usize {
        let mut cleared = self.clean_field(
            records,
            Field::Materials,
            self.settings.materials_min_len,
            self.settings.materials_min_group,
        );
        for field in [Field::DescriptionEn, Field::DescriptionCn] {
            cleared += self.clean_field(
                records,
                field,
                self.settings.description_min_len,
                self.settings.description_min_group,
            );
        }

        if cleared > 0 {
            info!("Contamination cleaner cleared {} fields", cleared);
            metrics::counter!("contamination_fields_cleared_total").increment(cleared as u64);
        }
        cleared
    }

    fn clean_field(&self, records: &mut [Record], field: Field, min_len: usize, min_group: usize) -> usize {
        // 值 → 按出现顺序的记录下标
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            let value = field.get(record).trim();
            if value.chars().count() <= min_len {
                continue;
            }
            match positions.get(value) {
                Some(&slot) => groups[slot].1.push(index),
                None => {
                    positions.insert(value.to_string(), groups.len());
                    groups.push((value.to_string(), vec![index]));
                }
            }
        }

        let mut cleared = 0;
        for (value, members) in groups.into_iter().filter(|(_, m)| m.len() >= min_group) {
            let winner = self.pick_winner(records, field, &value, &members);
            debug!(
                "{} shared by {} records, keeping {}",
                field.name(),
                members.len(),
                records[winner].url
            );
            for &index in members.iter().filter(|&&index| index != winner) {
                field.clear(&mut records[index]);
                cleared += 1;
            }
        }
        cleared
    }

    // 最高分胜出，同分取先出现者
    fn pick_winner(&self, records: &[Record], field: Field, value: &str, members: &[usize]) -> usize {
        let mut best = members[0];
        let mut best_score = i32::MIN;
        for &index in members {
            let score = match field {
                Field::Materials => self.score_materials_owner(records, &records[index], value),
                Field::DescriptionEn | Field::DescriptionCn => {
                    self.score_description_owner(records, &records[index], value)
                }
            };
            if score > best_score {
                best = index;
                best_score = score;
            }
        }
        best
    }

    fn score_materials_owner(&self, batch: &[Record], record: &Record, materials: &str) -> i32 {
        let mut score = 0;

        let description = primary_description(record);
        if description.chars().count() > self.settings.unique_description_min_len
            && count_matching(batch, |r| primary_description(r) == description) == 1
        {
            score += self.settings.unique_description_weight;
        }

        let materials_lower = materials.to_lowercase();
        let has_title_token = record
            .title
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| token.chars().count() > self.settings.title_token_min_len)
            .any(|token| materials_lower.contains(&token.to_lowercase()));
        if has_title_token {
            score += self.settings.title_token_weight;
        }

        score
    }

    fn score_description_owner(&self, batch: &[Record], record: &Record, text: &str) -> i32 {
        let mut score = 0;
        let text_lower = text.to_lowercase();

        let title_matches = [&record.title, &record.title_cn]
            .into_iter()
            .map(|title| title.trim())
            .filter(|title| title.chars().count() > self.settings.title_min_len)
            .any(|title| text_lower.contains(&title.to_lowercase()));
        if title_matches {
            score += self.settings.title_match_weight;
        }

        let slug = url_slug(&record.url);
        if slug.chars().count() > self.settings.title_min_len && text_lower.contains(&slug) {
            score += self.settings.slug_match_weight;
        }

        let materials = record.materials.trim();
        if !materials.is_empty() && count_matching(batch, |r| r.materials.trim() == materials) == 1 {
            score += self.settings.unique_materials_weight;
        }

        score
    }
}

fn primary_description(record: &Record) -> &str {
    let en = record.description_en.trim();
    if en.is_empty() {
        record.description_cn.trim()
    } else {
        en
    }
}

fn count_matching(batch: &[Record], predicate: impl Fn(&Record) -> bool) -> usize {
    batch.iter().filter(|r| predicate(r)).count()
}

/// URL 最后一段路径，连字符和下划线换成空格，小写
pub fn url_slug(url: &str) -> String {
    let path = url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .replace(['-', '_'], " ")
        .trim()
        .to_lowercase()
}

#[cfg(test)]
#[path = "contamination_cleaner_test.rs"]
mod tests;
