// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::infrastructure::cache::cache_store::CacheStore;
use crate::infrastructure::extraction_api::link_discoverer::{LinkDiscoverer, ScrollMode};
use crate::infrastructure::rate_limiter::RateLimiter;
use crate::utils::errors::ExtractionError;

/// 带 TTL 缓存的链接发现
pub struct DiscoverLinksUseCase {
    discoverer: LinkDiscoverer,
    cache: CacheStore,
    rate_limiter: Arc<RateLimiter>,
    ttl: Duration,
}

impl DiscoverLinksUseCase {
    pub fn new(
        discoverer: LinkDiscoverer,
        cache: CacheStore,
        rate_limiter: Arc<RateLimiter>,
        ttl: Duration,
    ) -> Self {
        Self {
            discoverer,
            cache,
            rate_limiter,
            ttl,
        }
    }

    /// 发现种子页面上的作品链接
    ///
    /// `use_cache` 为 true 时优先使用未过期的缓存；非空结果会写回缓存
    pub async fn execute(
        &self,
        seed_url: &str,
        mode: ScrollMode,
        use_cache: bool,
    ) -> Result<Vec<String>, ExtractionError> {
        if use_cache {
            if let Some(links) = self.cache.get_discovery(seed_url, mode.label(), self.ttl).await {
                info!("Using {} cached links for {} ({})", links.len(), seed_url, mode);
                return Ok(links);
            }
        }

        self.rate_limiter.wait().await;
        let links = self.discoverer.discover(seed_url, mode).await?;
        self.cache.put_discovery(seed_url, mode.label(), &links).await;
        Ok(links)
    }
}
