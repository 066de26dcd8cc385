// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::domain::models::record::Record;
use crate::domain::services::heuristics;

/// 本地解析器
///
/// 零成本、尽力而为地从原始页面内容抽取记录。
/// 无法识别时返回 `None`，不会报错。
pub trait LocalParser: Send + Sync {
    fn parse(&self, url: &str, page_content: &str) -> Option<Record>;
}

/// 通用 HTML 解析器
///
/// 标题取 `<h1>`，缺失时取 `<title>`（此时不取年份）；
/// 页眉、页脚、导航中的文本不参与年份识别；图片优先 `src_o` 高清属性；
/// 年份和视频链接沿用快照启发式的规则。
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlLocalParser;

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

// 站点外壳里的年份（版权、导航）不属于作品
const CHROME_ELEMENTS: [&str; 6] = ["header", "footer", "nav", "aside", "script", "style"];

fn is_chrome_line(text: &str) -> bool {
    text.contains('©') || text.to_lowercase().starts_with("copyright")
}

// 每个文本节点占一行，年份规则按行跳过含链接的文本
fn body_lines(document: &Html) -> String {
    let Some(sel) = selector("body") else {
        return String::new();
    };
    document
        .select(&sel)
        .flat_map(|body| body.descendants())
        .filter(|node| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| CHROME_ELEMENTS.contains(&el.name()))
            })
        })
        .filter_map(|node| node.value().as_text().map(|text| text.trim()))
        .filter(|text| !text.is_empty() && !is_chrome_line(text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn resolve(base: Option<&Url>, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() || link.starts_with("data:") {
        return None;
    }
    match base {
        Some(base) => base.join(link).ok().map(|u| u.to_string()),
        None if link.starts_with("http") => Some(link.to_string()),
        None => None,
    }
}

fn images(document: &Html, base: Option<&Url>) -> Vec<String> {
    let Some(sel) = selector("img") else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    document
        .select(&sel)
        .filter_map(|img| {
            let attrs = img.value();
            attrs
                .attr("src_o")
                .or_else(|| attrs.attr("data-src"))
                .or_else(|| attrs.attr("src"))
        })
        .filter_map(|src| resolve(base, src))
        .filter(|src| seen.insert(src.clone()))
        .collect()
}

fn video_link(document: &Html) -> Option<String> {
    let sel = selector("iframe[src], a[href]")?;
    document
        .select(&sel)
        .filter_map(|el| el.value().attr("src").or_else(|| el.value().attr("href")))
        .find_map(heuristics::find_video_link)
}

impl LocalParser for HtmlLocalParser {
    fn parse(&self, url: &str, page_content: &str) -> Option<Record> {
        let document = Html::parse_document(page_content);
        let base = Url::parse(url).ok();

        let heading = first_text(&document, "h1");
        let from_heading = heading.is_some();
        let title = heading.or_else(|| first_text(&document, "title"))?;
        // 没有 h1 时页面多半不是作品详情页，不从正文取年份
        let year = if from_heading {
            heuristics::find_year(&body_lines(&document)).unwrap_or_default()
        } else {
            String::new()
        };

        let mut record = Record {
            url: url.to_string(),
            title,
            year,
            category: first_text(&document, ".category, .type, [itemprop=genre]")
                .unwrap_or_default(),
            description_en: meta_content(
                &document,
                "meta[name=description], meta[property='og:description']",
            )
            .unwrap_or_default(),
            video_link: video_link(&document).unwrap_or_default(),
            images: images(&document, base.as_ref()),
            ..Default::default()
        };
        record.split_bilingual_title();
        Some(record)
    }
}
