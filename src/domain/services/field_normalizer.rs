// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 单条记录内的字段归位
//!
//! 抽取服务经常把尺寸、时长、署名塞进 `materials`，把署名或整段描述塞进 `type`。
//! 这里把它们移回各自的字段，无法归位的无效值直接清空。

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::domain::models::record::Record;

const TYPE_MAX_CHARS: usize = 100;
const MATERIALS_MAX_CHARS: usize = 150;
const CN_PROSE_MIN_CHARS: usize = 20;

const CREDIT_MARKERS: &[&str] = &[
    "collaboration",
    "made possible",
    "curated by",
    "this piece was done",
    "team:",
    "concept:",
    "sound:",
    "photo:",
    "director:",
    "venue",
    "copyright",
    "born in",
    "work involves",
];

// 命中这些时，被清出 materials 的文本转存到 credits
const CREDIT_CARRIERS: &[&str] = &["team:", "concept:", "collaboration"];

const SENTENCE_MARKERS: &[&str] = &[
    " is ", " are ", " was ", " were ", " build ", " builds ", " through ", "invit", " explore",
    " examine", " the ",
];

const CN_PROSE_MARKERS: &[&str] = &["生于", "工作涉及", "展览", "概念", "探索", "邀请", "创作"];

const QUOTE_OPENERS: &[char] = &[
    '"', '\u{201c}', '\u{201d}', '\u{300c}', '\u{300d}', '\u{300e}', '\'', '\u{2018}', '\u{300a}',
];

static CREDITS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^photo(?:\s+by)?:\s*.+",
        r"(?i)^concept:\s*.+",
        r"(?i)^sound:\s*.+",
        r"(?i)^software:\s*.+",
        r"(?i)^hardware:\s*.+",
        r"(?i)^computer graphics:\s*.+",
        r"(?i)^video editing:\s*.+",
        r"(?i)^technical support:\s*.+",
        r"(?i)^architecture:\s*.+",
        r"(?i)^interactive:\s*.+",
        r"(?i)^dancer:\s*.+",
        r"(?i)^actress:\s*.+",
        r"(?i)^curated by\s+.+",
        r"(?i)^copyright\s+(?:of|by)\s+.+",
        // role: name; role: name
        r"(?i)^.+:\s*[a-z]+(?:,\s*[a-z]+)*(?:;\s*[a-z\s]+:\s*[a-z]+(?:,\s*[a-z]+)*)+",
        r"(?i)^made possible (?:with|by)\s+.+",
        r"(?i)^collaboration (?:of|with)\s+.+",
        r"(?i)^web software:\s*.+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid credits regex"))
    .collect()
});

// 整个字段就是尺寸说明
static PURE_SIZE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^Dimensions?\s+variable\s*/?\s*尺寸可变$",
        r"(?i)^Dimensions?\s+variable$",
        r"^尺寸可变$",
        r"(?i)^Variable\s+dimensions?$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid size regex"))
    .collect()
});

// 先于尺寸识别，避免时长里的数字被当成尺寸
static DURATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)video\s+(\d+['′’"″]+)"#,
        r#"(\d+['′]\s*\d+['′’"″]+)"#,
        r"(\d+:\d+(?::\d+)?)",
        r"(?i)(\d+\s*min(?:utes?)?)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid duration regex"))
    .collect()
});

static SIZE_PATTERNS: Lazy<Vec<(Regex, Option<&'static str>)>> = Lazy::new(|| {
    [
        (
            r"(?i)Dimensions?\s+variable\s*/\s*尺寸可变",
            Some("Dimension variable / 尺寸可变"),
        ),
        (r"(?i)Dimensions?\s+variable", Some("Dimension variable")),
        (r"尺寸可变", Some("尺寸可变")),
        (
            r"(?i)[,;]?\s*size\s+(\d+\s*[×xX]\s*\d+(?:\s*[×xX]\s*\d+)?\s*(?:cm|mm|m)?)",
            None,
        ),
        (
            r"(?i)[,;]?\s*(\d+\s*[×xX]\s*\d+(?:\s*[×xX]\s*\d+)?\s*(?:cm|mm)?)\s*[,;]?",
            None,
        ),
    ]
    .into_iter()
    .map(|(p, fixed)| (Regex::new(p).expect("valid size regex"), fixed))
    .collect()
});

static DIMENSION_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Dimension").expect("valid dimension regex"));

static DOUBLE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;]\s*[,;]").expect("valid separator regex"));
static EDGE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[,;\s]+|[,;\s]+$").expect("valid separator regex"));
static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

static MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)").expect("valid month regex")
});
static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}\.\d{2}\.\d{4}\s*[-–]\s*\d{1,2}\.\d{2}\.\d{4}").expect("valid date regex")
});

/// 字段归位器
///
/// 无状态，按固定顺序处理：`type` 占位值 → 署名 → 无效 `type` →
/// 错放的 `materials` → 尺寸与时长 → 被当成时长的日期。
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldNormalizer;

impl FieldNormalizer {
    /// 归位一条记录，返回是否有字段被改动
    pub fn normalize(&self, record: &mut Record) -> bool {
        let before = record.clone();

        clear_null_type(record);
        move_credits(record);
        clear_invalid_type(record);
        clear_misplaced_materials(record);
        split_size_and_duration(record);
        move_dimension_to_size(record);
        clear_date_duration(record);

        let changed = *record != before;
        if changed {
            debug!("Normalized fields of {}", record.url);
        }
        changed
    }

    /// 归位一个批次，返回被改动的记录数
    pub fn normalize_all(&self, records: &mut [Record]) -> usize {
        let changed = records
            .iter_mut()
            .map(|record| self.normalize(record))
            .filter(|changed| *changed)
            .count();
        if changed > 0 {
            info!("Field normalizer adjusted {} records", changed);
            metrics::counter!("records_normalized_total").increment(changed as u64);
        }
        changed
    }
}

fn is_credits(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && CREDITS_PATTERNS.iter().any(|re| re.is_match(text))
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// 看起来像描述或署名，而不是材料清单
fn is_prose(text: &str) -> bool {
    let lower = text.to_lowercase();

    if CREDIT_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return true;
    }
    if SENTENCE_MARKERS.iter().filter(|marker| lower.contains(*marker)).count() >= 2 {
        return true;
    }
    if text.starts_with(QUOTE_OPENERS) || text.contains('©') {
        return true;
    }
    if text.chars().count() > MATERIALS_MAX_CHARS {
        return true;
    }
    CN_PROSE_MARKERS.iter().any(|marker| text.contains(marker))
        && text.chars().filter(|c| is_cjk(*c)).count() > CN_PROSE_MIN_CHARS
}

fn is_title_as_materials(materials: &str, title: &str, title_cn: &str) -> bool {
    let materials = materials.trim().to_lowercase();
    let title = title.trim().to_lowercase();
    let title_cn = title_cn.trim();

    if !title.is_empty() && materials == title {
        return true;
    }
    let parts: Vec<&str> = materials.split('/').map(str::trim).collect();
    parts.len() == 2
        && ((!title.is_empty() && parts[0] == title) || (!title_cn.is_empty() && parts[1] == title_cn))
}

fn clear_null_type(record: &mut Record) {
    if record.category.trim().eq_ignore_ascii_case("null") {
        record.category.clear();
    }
}

fn move_credits(record: &mut Record) {
    if is_credits(&record.materials) {
        if record.credits.trim().is_empty() {
            record.credits = record.materials.trim().to_string();
        }
        record.materials.clear();
    }
    if is_credits(&record.category) {
        if record.credits.trim().is_empty() {
            record.credits = record.category.trim().to_string();
        }
        record.category.clear();
    }
}

fn clear_invalid_type(record: &mut Record) {
    let category = record.category.trim();
    if category.starts_with("http") || category.chars().count() > TYPE_MAX_CHARS {
        record.category.clear();
    }
}

fn clear_misplaced_materials(record: &mut Record) {
    let materials = record.materials.trim();
    if materials.is_empty() {
        return;
    }
    if is_title_as_materials(materials, &record.title, &record.title_cn) {
        record.materials.clear();
        return;
    }
    if is_prose(materials) {
        let lower = materials.to_lowercase();
        if record.credits.trim().is_empty()
            && CREDIT_CARRIERS.iter().any(|marker| lower.contains(marker))
        {
            record.credits = materials.to_string();
        }
        record.materials.clear();
    }
}

/// 把尺寸和时长从材料文本中拆出来，返回 (材料, 尺寸, 时长)
fn split_materials(materials: &str) -> (String, String, String) {
    let trimmed = materials.trim();
    if PURE_SIZE_PATTERNS.iter().any(|re| re.is_match(trimmed)) {
        return (String::new(), trimmed.to_string(), String::new());
    }

    let mut cleaned = trimmed.to_string();

    let mut duration = String::new();
    for re in DURATION_PATTERNS.iter() {
        let Some(caps) = re.captures(&cleaned) else {
            continue;
        };
        duration = caps[1].trim().to_string();
        cleaned = re.replace_all(&cleaned, "").into_owned();
        break;
    }

    let mut size = String::new();
    for (re, fixed) in SIZE_PATTERNS.iter() {
        let Some(caps) = re.captures(&cleaned) else {
            continue;
        };
        size = match fixed {
            Some(fixed) => fixed.to_string(),
            None => caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
        };
        cleaned = re.replace_all(&cleaned, "").into_owned();
        break;
    }

    let cleaned = DOUBLE_SEPARATOR_RE.replace_all(&cleaned, ",");
    let cleaned = EDGE_SEPARATOR_RE.replace_all(&cleaned, "");
    let cleaned = MULTI_SPACE_RE.replace_all(&cleaned, " ");
    (cleaned.trim().to_string(), size, duration)
}

fn split_size_and_duration(record: &mut Record) {
    let has_size = !record.size.trim().is_empty();
    let has_duration = !record.duration.trim().is_empty();
    if record.materials.trim().is_empty() || (has_size && has_duration) {
        return;
    }

    let (materials, size, duration) = split_materials(&record.materials);
    record.materials = materials;
    if !has_size && !size.is_empty() {
        record.size = size;
    }
    if !has_duration && !duration.is_empty() {
        record.duration = duration;
    }
}

fn move_dimension_to_size(record: &mut Record) {
    if !DIMENSION_PREFIX_RE.is_match(record.materials.trim()) {
        return;
    }
    let materials = std::mem::take(&mut record.materials);
    if record.size.trim().is_empty() {
        record.size = materials.trim().to_string();
    }
}

fn clear_date_duration(record: &mut Record) {
    let duration = record.duration.trim();
    if duration.is_empty() {
        return;
    }
    if MONTH_RE.is_match(duration) || DATE_RANGE_RE.is_match(duration) {
        record.duration.clear();
    }
}
