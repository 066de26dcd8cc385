// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Value};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::infrastructure::extraction_api::client::ExtractionApi;
use crate::utils::errors::ExtractionError;

const DISCOVERY_PROMPT: &str = "Extract all artwork URLs from the page. Return ONLY a list of URLs.";

const SCROLL_RIGHT_SCRIPT: &str =
    "window.scrollTo(document.documentElement.scrollWidth, 0); window.dispatchEvent(new Event('scroll'));";

/// 滚动模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// 先横向再纵向
    #[default]
    Auto,
    /// 横向滚动画廊
    Horizontal,
    /// 普通纵向页面
    Vertical,
}

impl ScrollMode {
    pub fn label(&self) -> &'static str {
        match self {
            ScrollMode::Auto => "auto",
            ScrollMode::Horizontal => "horizontal",
            ScrollMode::Vertical => "vertical",
        }
    }

    /// 构造页面动作脚本
    pub fn actions(&self) -> Vec<Value> {
        let mut actions = vec![wait(2000)];
        match self {
            ScrollMode::Horizontal => {
                for _ in 0..20 {
                    actions.push(scroll_right());
                    actions.push(wait(1500));
                }
            }
            ScrollMode::Vertical => {
                for _ in 0..5 {
                    actions.push(scroll_down());
                    actions.push(wait(1500));
                }
            }
            ScrollMode::Auto => {
                for _ in 0..15 {
                    actions.push(scroll_right());
                    actions.push(wait(1500));
                }
                for _ in 0..3 {
                    actions.push(scroll_down());
                }
            }
        }
        actions
    }
}

impl fmt::Display for ScrollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScrollMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ScrollMode::Auto),
            "horizontal" => Ok(ScrollMode::Horizontal),
            "vertical" => Ok(ScrollMode::Vertical),
            other => Err(format!("unknown scroll mode: {}", other)),
        }
    }
}

fn wait(milliseconds: u64) -> Value {
    json!({"type": "wait", "milliseconds": milliseconds})
}

fn scroll_right() -> Value {
    json!({"type": "executeJavascript", "script": SCROLL_RIGHT_SCRIPT})
}

fn scroll_down() -> Value {
    json!({"type": "scroll", "direction": "down"})
}

/// 滚动驱动的链接发现
///
/// 让服务在渲染页面上执行滚动脚本，再抽取作品链接
pub struct LinkDiscoverer {
    api: Arc<dyn ExtractionApi>,
}

impl LinkDiscoverer {
    pub fn new(api: Arc<dyn ExtractionApi>) -> Self {
        Self { api }
    }

    pub async fn discover(&self, seed_url: &str, mode: ScrollMode) -> Result<Vec<String>, ExtractionError> {
        info!("Discovering links on {} (mode: {})", seed_url, mode);
        let body = json!({
            "url": seed_url,
            "formats": ["extract"],
            "actions": mode.actions(),
            "extract": {"prompt": DISCOVERY_PROMPT}
        });

        let data = self.api.scrape(&body).await?;
        let links = parse_links(&data);
        info!("Discovered {} links on {}", links.len(), seed_url);
        Ok(links)
    }
}

/// 从抓取结果中取出链接
///
/// 接受 `extract.urls`/`extract.links`（字符串或带 `url` 的对象），
/// 或直接返回的数组，以及顶层 `links`
pub fn parse_links(data: &Value) -> Vec<String> {
    let extract = data.get("extract").unwrap_or(&Value::Null);
    let candidates = [
        extract.get("urls"),
        extract.get("links"),
        extract.as_array().map(|_| extract),
        data.get("links"),
    ];

    let Some(list) = candidates.into_iter().flatten().find_map(Value::as_array) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    list.iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(url.trim()),
            other => other.get("url").and_then(Value::as_str).map(str::trim),
        })
        .filter(|url| url.starts_with("http"))
        .filter(|url| seen.insert(url.to_string()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_scripts() {
        assert_eq!(ScrollMode::Horizontal.actions().len(), 41);
        assert_eq!(ScrollMode::Vertical.actions().len(), 11);
        assert_eq!(ScrollMode::Auto.actions().len(), 34);
        assert_eq!(ScrollMode::Auto.actions()[0]["type"], "wait");
    }

    #[test]
    fn test_parse_links_shapes() {
        let objects = json!({"extract": {"urls": [{"url": "https://a.com/1"}, {"title": "no url"}]}});
        assert_eq!(parse_links(&objects), vec!["https://a.com/1".to_string()]);

        let strings = json!({"extract": {"links": ["https://a.com/1", "https://a.com/1", "/relative"]}});
        assert_eq!(parse_links(&strings), vec!["https://a.com/1".to_string()]);

        let top_level = json!({"links": ["https://a.com/2"]});
        assert_eq!(parse_links(&top_level), vec!["https://a.com/2".to_string()]);

        assert!(parse_links(&json!({"markdown": "# nothing"})).is_empty());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Horizontal".parse::<ScrollMode>(), Ok(ScrollMode::Horizontal));
        assert!("diagonal".parse::<ScrollMode>().is_err());
    }
}
