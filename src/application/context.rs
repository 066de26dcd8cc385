// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::application::use_cases::agent_search::AgentSearchUseCase;
use crate::application::use_cases::batch_extract::BatchExtractUseCase;
use crate::application::use_cases::discover_links::DiscoverLinksUseCase;
use crate::application::use_cases::tiered_batch::TieredBatchUseCase;
use crate::config::settings::Settings;
use crate::domain::models::extraction_level::ExtractionLevel;
use crate::domain::services::contamination_cleaner::ContaminationCleaner;
use crate::domain::services::local_parser::HtmlLocalParser;
use crate::engines::ai_tier::AiTier;
use crate::engines::heuristic_tier::{HeuristicTier, ServiceSnapshotSource};
use crate::engines::local_tier::LocalTier;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::tiered_extractor::TieredExtractor;
use crate::engines::traits::ExtractionTier;
use crate::infrastructure::cache::cache_store::CacheStore;
use crate::infrastructure::extraction_api::client::{ExtractionApi, HttpExtractionClient};
use crate::infrastructure::extraction_api::job_poller::JobPoller;
use crate::infrastructure::extraction_api::link_discoverer::LinkDiscoverer;
use crate::infrastructure::rate_limiter::RateLimiter;
use crate::infrastructure::storage::create_storage_repository;
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::manager::ConcurrencyManager;

/// 应用上下文
///
/// 持有进程内共享的组件：一个速率限制器、一个缓存、一个服务客户端。
/// 各用例都从这里组装，保证所有付费调用经过同一个限流器。
pub struct AppContext {
    settings: Settings,
    cache: CacheStore,
    api: Arc<dyn ExtractionApi>,
    has_credentials: bool,
    rate_limiter: Arc<RateLimiter>,
    poller: Arc<JobPoller>,
    page_fetcher: Arc<ReqwestEngine>,
}

impl AppContext {
    /// 从配置构建上下文
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let storage = create_storage_repository(&settings.cache)
            .context("Failed to initialize cache storage")?;
        let cache = if settings.cache.enabled {
            CacheStore::new(storage)
        } else {
            info!("Cache disabled");
            CacheStore::disabled(storage)
        };

        let client = HttpExtractionClient::new(&settings.service)
            .context("Failed to initialize extraction service client")?;
        let has_credentials = client.has_credentials();
        if !has_credentials {
            warn!("No extraction service API key configured, paid tiers will fail");
        }

        let page_fetcher = ReqwestEngine::new(Duration::from_secs(
            settings.service.request_timeout_secs,
        ))
        .context("Failed to initialize page fetcher")?;

        Ok(Self::from_parts(
            settings,
            cache,
            Arc::new(client),
            has_credentials,
            Arc::new(page_fetcher),
        ))
    }

    /// 用现成的组件构建上下文，测试可以传入替身服务
    pub fn from_parts(
        settings: Settings,
        cache: CacheStore,
        api: Arc<dyn ExtractionApi>,
        has_credentials: bool,
        page_fetcher: Arc<ReqwestEngine>,
    ) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(settings.rate_limiting.calls_per_minute));
        let poller = Arc::new(JobPoller::new(
            api.clone(),
            rate_limiter.clone(),
            RetryPolicy::from_settings(&settings.retry),
            Duration::from_secs(settings.polling.interval_secs),
        ));

        Self {
            settings,
            cache,
            api,
            has_credentials,
            rate_limiter,
            poller,
            page_fetcher,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    fn cleaner(&self) -> ContaminationCleaner {
        ContaminationCleaner::new(self.settings.contamination.clone())
    }

    /// 本地 → 启发式 → AI 三层抽取器
    pub fn tiered_extractor(&self, level: ExtractionLevel, prompt: &str) -> TieredExtractor {
        let tiers: Vec<Arc<dyn ExtractionTier>> = vec![
            Arc::new(LocalTier::new(
                self.page_fetcher.clone(),
                Arc::new(HtmlLocalParser),
            )),
            Arc::new(HeuristicTier::new(Arc::new(ServiceSnapshotSource::new(
                self.api.clone(),
                self.rate_limiter.clone(),
            )))),
            Arc::new(AiTier::new(
                self.poller.clone(),
                level,
                prompt,
                Duration::from_secs(self.settings.polling.single_max_wait_secs),
            )),
        ];
        TieredExtractor::new(tiers, self.cache.clone())
    }

    pub fn tiered_batch(&self, level: ExtractionLevel, prompt: &str) -> TieredBatchUseCase {
        TieredBatchUseCase::new(
            Arc::new(self.tiered_extractor(level, prompt)),
            ConcurrencyManager::new(self.settings.concurrency.local_workers),
            self.cleaner(),
        )
    }

    pub fn batch_extract(&self) -> BatchExtractUseCase {
        BatchExtractUseCase::new(
            self.poller.clone(),
            self.cache.clone(),
            ConcurrencyManager::new(self.settings.concurrency.ai_workers),
            self.cleaner(),
            self.settings.concurrency.max_batch_items,
            Duration::from_secs(self.settings.polling.single_max_wait_secs),
            self.has_credentials,
        )
    }

    pub fn agent_search(&self) -> AgentSearchUseCase {
        AgentSearchUseCase::new(
            self.poller.clone(),
            Duration::from_secs(self.settings.polling.agent_max_wait_secs),
        )
    }

    pub fn discover_links(&self) -> DiscoverLinksUseCase {
        DiscoverLinksUseCase::new(
            LinkDiscoverer::new(self.api.clone()),
            self.cache.clone(),
            self.rate_limiter.clone(),
            Duration::from_secs(self.settings.cache.discovery_ttl_hours * 3600),
        )
    }
}
