// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::models::record::Record;
use crate::domain::services::local_parser::LocalParser;
use crate::engines::traits::{ExtractionTier, PageFetcher, TierError, TierKind};

/// 第一层：获取原始页面并交给本地解析器
pub struct LocalTier {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn LocalParser>,
}

impl LocalTier {
    pub fn new(fetcher: Arc<dyn PageFetcher>, parser: Arc<dyn LocalParser>) -> Self {
        Self { fetcher, parser }
    }
}

#[async_trait]
impl ExtractionTier for LocalTier {
    async fn extract(&self, url: &str, _partial: &Record) -> Result<Option<Record>, TierError> {
        let content = self.fetcher.fetch(url).await?;
        Ok(self.parser.parse(url, &content))
    }

    fn kind(&self) -> TierKind {
        TierKind::Local
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
