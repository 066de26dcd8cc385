// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::domain::models::record::Record;
use crate::utils::errors::ExtractionError;

/// 抽取层错误类型
#[derive(Error, Debug)]
pub enum TierError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 页面返回非成功状态码
    #[error("Unexpected status code: {0}")]
    Status(u16),
    /// 抽取服务错误
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 抽取层级，按成本从低到高
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierKind {
    /// 本地解析，零成本
    Local,
    /// 快照启发式，低额固定成本
    Heuristic,
    /// AI 抽取，最贵
    Ai,
}

impl TierKind {
    pub fn label(&self) -> &'static str {
        match self {
            TierKind::Local => "local",
            TierKind::Heuristic => "heuristic",
            TierKind::Ai => "ai",
        }
    }
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 抽取层特质
///
/// `partial` 是前面各层合并出的部分结果。
/// 返回 `Ok(None)` 表示本层没有贡献。
#[async_trait]
pub trait ExtractionTier: Send + Sync {
    /// 执行本层抽取
    async fn extract(&self, url: &str, partial: &Record) -> Result<Option<Record>, TierError>;

    /// 层级
    fn kind(&self) -> TierKind;

    /// 层名称
    fn name(&self) -> &'static str;
}

/// 原始页面获取
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, TierError>;
}

/// 渲染后的 markdown 快照
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn markdown(&self, url: &str) -> Result<String, TierError>;
}
