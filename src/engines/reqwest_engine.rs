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

use crate::engines::traits::{PageFetcher, TierError};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 页面获取引擎
///
/// 基于reqwest的原始 HTML 获取，供本地解析层使用
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建引擎
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求超时
    pub fn new(timeout: Duration) -> Result<Self, TierError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    /// 获取页面内容
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 页面文本
    /// * `Err(TierError)` - 传输错误或非 2xx 状态码
    async fn fetch(&self, url: &str) -> Result<String, TierError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TierError::Status(status.as_u16()));
        }

        let content = response.text().await?;
        debug!(
            "Fetched {} ({} bytes) in {:?}",
            url,
            content.len(),
            start.elapsed()
        );
        Ok(content)
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
