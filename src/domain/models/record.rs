// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 被识别为展览/画册（非作品）页面的类别关键词
const NON_ARTWORK_KEYWORDS: &[&str] = &["exhibition", "catalog", "catalogue", "展览", "画册"];

/// 作品记录
///
/// 一个页面抽取出的作品元数据。记录的身份是来源 URL，
/// 所有字段默认为空，空字符串与缺失等价。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// 来源URL（记录身份）
    pub url: String,
    /// 英文标题
    pub title: String,
    /// 中文标题
    pub title_cn: String,
    /// 创作年份或年份区间
    pub year: String,
    /// 作品类别
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    /// 材料
    pub materials: String,
    /// 英文描述
    pub description_en: String,
    /// 中文描述
    pub description_cn: String,
    /// 视频链接
    pub video_link: String,
    /// 尺寸
    pub size: String,
    /// 时长
    pub duration: String,
    /// 署名/合作者
    pub credits: String,
    /// 图片URL（有序）
    pub images: Vec<String>,
    /// 标签
    pub tags: Vec<String>,
    /// 错误标注（软失败时存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Record {
    /// 创建只带URL的空记录
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 创建带错误标注的软失败记录
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: Some(reason.into()),
            ..Default::default()
        }
    }

    /// 是否为软失败记录
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// 类别是否表明这是展览或画册页面
    pub fn is_exhibition(&self) -> bool {
        let category = self.category.to_lowercase();
        NON_ARTWORK_KEYWORDS.iter().any(|kw| category.contains(kw))
    }

    /// 是否至少包含一个有信息量的字段
    pub fn is_informative(&self) -> bool {
        !self.title.trim().is_empty()
            || !self.title_cn.trim().is_empty()
            || !self.description_en.trim().is_empty()
            || !self.description_cn.trim().is_empty()
            || !self.images.is_empty()
    }

    /// 除URL外是否完全没有内容
    pub fn has_no_content(&self) -> bool {
        let text_fields = [
            &self.title,
            &self.title_cn,
            &self.year,
            &self.category,
            &self.materials,
            &self.description_en,
            &self.description_cn,
            &self.video_link,
            &self.size,
            &self.duration,
            &self.credits,
        ];
        text_fields.iter().all(|f| f.trim().is_empty())
            && self.images.is_empty()
            && self.tags.is_empty()
    }

    /// 用另一条记录补全本记录中为空的字段
    ///
    /// 已有非空字段永远不会被覆盖。返回被补全的字段数。
    pub fn fill_empty_from(&mut self, other: &Record) -> usize {
        let mut filled = 0;
        filled += fill_text(&mut self.url, &other.url) as usize;
        filled += fill_text(&mut self.title, &other.title) as usize;
        filled += fill_text(&mut self.title_cn, &other.title_cn) as usize;
        filled += fill_text(&mut self.year, &other.year) as usize;
        filled += fill_text(&mut self.category, &other.category) as usize;
        filled += fill_text(&mut self.materials, &other.materials) as usize;
        filled += fill_text(&mut self.description_en, &other.description_en) as usize;
        filled += fill_text(&mut self.description_cn, &other.description_cn) as usize;
        filled += fill_text(&mut self.video_link, &other.video_link) as usize;
        filled += fill_text(&mut self.size, &other.size) as usize;
        filled += fill_text(&mut self.duration, &other.duration) as usize;
        filled += fill_text(&mut self.credits, &other.credits) as usize;
        if self.images.is_empty() && !other.images.is_empty() {
            self.images = other.images.clone();
            filled += 1;
        }
        if self.tags.is_empty() && !other.tags.is_empty() {
            self.tags = other.tags.clone();
            filled += 1;
        }
        filled
    }

    /// 拆分 "English Title / 中文标题" 形式的标题
    ///
    /// 仅在中文标题为空时生效
    pub fn split_bilingual_title(&mut self) {
        if !self.title_cn.trim().is_empty() || !self.title.contains('/') {
            return;
        }
        let mut parts = self.title.splitn(2, '/');
        let english = parts.next().unwrap_or_default().trim().to_string();
        let chinese = parts.next().unwrap_or_default().trim().to_string();
        self.title = english;
        self.title_cn = chinese;
    }

    /// 从抽取服务返回的单个条目映射为记录
    ///
    /// 服务返回的字段名并不稳定：URL 可能是 `url`/`sourceURL`/`source_url`，
    /// 类别可能是 `category`/`type`，图片可能是 `high_res_images`/`images`/`image`。
    pub fn from_service_item(item: &Value, fallback_url: Option<&str>) -> Self {
        let url = first_str(item, &["url", "sourceURL", "source_url"])
            .or(fallback_url)
            .unwrap_or_default()
            .to_string();

        let mut record = Self {
            url,
            title: str_field(item, "title"),
            title_cn: str_field(item, "title_cn"),
            year: year_field(item),
            category: first_str(item, &["category", "type"])
                .unwrap_or_default()
                .to_string(),
            materials: str_field(item, "materials"),
            description_en: str_field(item, "description_en"),
            description_cn: str_field(item, "description_cn"),
            video_link: str_field(item, "video_link"),
            size: str_field(item, "size"),
            duration: str_field(item, "duration"),
            credits: str_field(item, "credits"),
            images: images_field(item),
            tags: list_field(item, "tags"),
            error: None,
        };
        record.split_bilingual_title();
        record
    }
}

fn fill_text(target: &mut String, source: &str) -> bool {
    if target.trim().is_empty() && !source.trim().is_empty() {
        *target = source.to_string();
        true
    } else {
        false
    }
}

fn first_str<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| item.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn str_field(item: &Value, key: &str) -> String {
    first_str(item, &[key]).unwrap_or_default().to_string()
}

// 年份偶尔以数字形式返回
fn year_field(item: &Value) -> String {
    match item.get("year") {
        Some(Value::Number(n)) => n.to_string(),
        _ => str_field(item, "year"),
    }
}

fn list_field(item: &Value, key: &str) -> Vec<String> {
    match item.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn images_field(item: &Value) -> Vec<String> {
    for key in ["high_res_images", "images", "image"] {
        let values = list_field(item, key);
        if !values.is_empty() {
            return values;
        }
    }
    Vec::new()
}
