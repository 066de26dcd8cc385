// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// 默认提示词：不指定级别时使用
pub const DEFAULT_PROMPT: &str = "Extract all text content from the page (title, description, metadata, full text). Also extract the URL of the first visible image (or main artwork image) and map it to the field 'image'. IMPORTANT: If the image has a 'src_o' attribute, extract that URL for high resolution.";

const QUICK_PROMPT: &str = "Extract basic artwork info: title (English and Chinese if available), year, and category. Return JSON only, no explanation.";

const FULL_PROMPT: &str = "Extract complete artwork details including title, year, category, full descriptions in English and Chinese, materials, and all high-resolution image URLs (use 'src_o' attribute when available). Return JSON only.";

const IMAGES_ONLY_PROMPT: &str = "Extract all high-resolution image URLs from the page. Prioritize 'src_o' attributes for high-res versions. Exclude thumbnails and icons. Return as JSON array of URLs.";

/// 抽取级别
///
/// 不同级别使用不同的 schema 与提示词，抽取缓存按提示词区分，
/// 因此同一URL的多个级别可以共存。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionLevel {
    /// 只取核心字段，节省额度
    Quick,
    /// 完整字段
    Full,
    /// 仅高清图片
    ImagesOnly,
    /// 调用方自定义提示词，不附带 schema
    #[default]
    Custom,
}

impl ExtractionLevel {
    /// 级别对应的 schema
    pub fn schema(&self) -> Option<Value> {
        match self {
            ExtractionLevel::Quick => Some(json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "English title of the artwork"},
                    "title_cn": {"type": "string", "description": "Chinese title if available"},
                    "year": {"type": "string", "description": "Creation year or year range"},
                    "category": {"type": "string", "description": "Art category (e.g. Video, Installation)"},
                    "has_images": {"type": "boolean", "description": "Whether the page contains images"}
                }
            })),
            ExtractionLevel::Full => Some(json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "English title"},
                    "title_cn": {"type": "string", "description": "Chinese title"},
                    "year": {"type": "string", "description": "Creation year"},
                    "category": {"type": "string", "description": "Art category"},
                    "description_en": {"type": "string", "description": "Full English description"},
                    "description_cn": {"type": "string", "description": "Full Chinese description"},
                    "high_res_images": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "High-res image URLs, prefer 'src_o' attribute"
                    },
                    "video_link": {"type": "string", "description": "Vimeo/YouTube URL if present"},
                    "materials": {"type": "string", "description": "Materials used in the artwork"}
                }
            })),
            ExtractionLevel::ImagesOnly | ExtractionLevel::Custom => None,
        }
    }

    fn template(&self) -> Option<&'static str> {
        match self {
            ExtractionLevel::Quick => Some(QUICK_PROMPT),
            ExtractionLevel::Full => Some(FULL_PROMPT),
            ExtractionLevel::ImagesOnly => Some(IMAGES_ONLY_PROMPT),
            ExtractionLevel::Custom => None,
        }
    }

    /// 解析最终使用的提示词
    ///
    /// 空提示词或默认提示词会被替换为级别模板；自定义级别原样使用。
    pub fn resolve_prompt(&self, prompt: &str) -> String {
        let prompt = prompt.trim();
        let is_default = prompt.is_empty() || prompt == DEFAULT_PROMPT;
        match self.template() {
            Some(template) if is_default => template.to_string(),
            _ if prompt.is_empty() => DEFAULT_PROMPT.to_string(),
            _ => prompt.to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExtractionLevel::Quick => "quick",
            ExtractionLevel::Full => "full",
            ExtractionLevel::ImagesOnly => "images_only",
            ExtractionLevel::Custom => "custom",
        }
    }
}

impl fmt::Display for ExtractionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExtractionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "quick" => Ok(ExtractionLevel::Quick),
            "full" => Ok(ExtractionLevel::Full),
            "images_only" | "images" => Ok(ExtractionLevel::ImagesOnly),
            "custom" => Ok(ExtractionLevel::Custom),
            other => Err(format!("unknown extraction level: {}", other)),
        }
    }
}
