// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 基于正则与文本规则的字段推断
//!
//! 输入是页面渲染后的 markdown 快照，只取前 2000 个字符（作品信息通常在页面开头）。

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::domain::models::record::Record;

const SNAPSHOT_PREFIX_CHARS: usize = 2000;
const TYPE_SCAN_LINES: usize = 15;

const TYPE_KEYWORDS: &[&str] = &[
    "video installation",
    "installation",
    "video",
    "website",
    "software",
    "performance",
    "exhibition",
    "single channel video",
    "装置",
    "录像装置",
    "录像",
    "网站",
];

static SIZE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)size\s+(\d+\s*(?:cm|mm)?\s*[×xX]\s*\d+(?:\s*(?:cm|mm)?\s*[×xX]\s*\d+)?\s*(?:cm|mm|m)?)",
        r"(?i)^(\d+\s*[×xX]\s*\d+\s*[×xX]\s*\d+\s*(?:cm|mm)?)$",
        r"(?i)(Dimensions?\s+variable\s*/\s*尺寸可变)",
        r"(?i)(Dimensions?\s+variable)",
        r"^(尺寸可变)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid size regex"))
    .collect()
});

static DURATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"^(\d+['′’]\d+['′’"″]*)\s*$"#,
        r#"^(\d+['′’"″]+)\s*$"#,
        r#"(?i)video\s+(\d+['′’"″]+)"#,
        r"^(\d+:\d+(?::\d+)?)\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid duration regex"))
    .collect()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:19|20)\d{2}(?:\s*[-–]\s*(?:19|20)\d{2})?)\b").expect("valid year regex")
});

static VIDEO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://(?:www\.|player\.)?(?:vimeo\.com|youtube\.com|youtu\.be)/[^\s)\]"'<>]+"#)
        .expect("valid video regex")
});

static MARKDOWN_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[[^\]]*\]\((https?://[^)\s]+)").expect("valid image regex")
});

/// 文本中第一个年份或年份区间
pub fn find_year(text: &str) -> Option<String> {
    text.lines()
        .filter(|line| !line.contains("http"))
        .find_map(|line| YEAR_RE.captures(line))
        .map(|caps| caps[1].to_string())
}

/// 文本中第一个 Vimeo/YouTube 链接
pub fn find_video_link(text: &str) -> Option<String> {
    VIDEO_RE.find(text).map(|m| m.as_str().to_string())
}

fn first_line_match(lines: &[&str], patterns: &[Regex]) -> Option<String> {
    lines.iter().map(|line| line.trim()).find_map(|line| {
        patterns
            .iter()
            .find_map(|re| re.captures(line))
            .map(|caps| caps[1].trim().to_string())
    })
}

fn find_category(lines: &[&str]) -> Option<String> {
    lines.iter().take(TYPE_SCAN_LINES).find_map(|line| {
        let line = line.trim();
        let lower = line.to_lowercase();
        TYPE_KEYWORDS
            .iter()
            .any(|kw| {
                lower == *kw
                    || lower.starts_with(&format!("{} ", kw))
                    || lower.starts_with(&format!("{}/", kw))
            })
            .then(|| line.to_string())
    })
}

fn find_title(lines: &[&str]) -> Option<String> {
    let heading = |prefix: &str| {
        lines
            .iter()
            .map(|line| line.trim())
            .find(|line| line.starts_with(prefix))
            .map(|line| line.trim_start_matches('#').trim().to_string())
            .filter(|title| !title.is_empty())
    };
    heading("# ").or_else(|| heading("## "))
}

fn find_images(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    MARKDOWN_IMAGE_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// 从 markdown 快照推断字段
///
/// 返回的记录没有设置 URL，未识别的字段保持为空
pub fn parse_markdown(markdown: &str) -> Record {
    let text: String = markdown.chars().take(SNAPSHOT_PREFIX_CHARS).collect();
    let lines: Vec<&str> = text.lines().collect();

    let mut record = Record {
        title: find_title(&lines).unwrap_or_default(),
        year: find_year(&text).unwrap_or_default(),
        category: find_category(&lines).unwrap_or_default(),
        size: first_line_match(&lines, &SIZE_PATTERNS).unwrap_or_default(),
        duration: first_line_match(&lines, &DURATION_PATTERNS).unwrap_or_default(),
        video_link: find_video_link(markdown).unwrap_or_default(),
        images: find_images(markdown),
        ..Default::default()
    };
    record.split_bilingual_title();
    record
}
