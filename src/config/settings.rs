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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含抽取服务、速率限制、缓存、轮询、重试、并发和污染清理等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 抽取服务配置
    pub service: ServiceSettings,
    /// 速率限制配置
    pub rate_limiting: RateLimitingSettings,
    /// 缓存配置
    pub cache: CacheSettings,
    /// 任务轮询配置
    pub polling: PollingSettings,
    /// 限流重试配置
    pub retry: RetrySettings,
    /// 并发控制配置
    pub concurrency: ConcurrencySettings,
    /// 污染清理阈值
    pub contamination: ContaminationSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 抽取服务配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    /// 服务基础URL
    pub base_url: String,
    /// API 密钥
    pub api_key: Option<String>,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

/// 速率限制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 每分钟允许的付费调用数
    pub calls_per_minute: u32,
}

/// 缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// 是否启用缓存
    pub enabled: bool,
    /// 存储后端 (local, memory, redis)
    pub backend: String,
    /// 本地缓存目录 (当 backend=local 时使用)
    pub local_path: String,
    /// Redis连接URL (当 backend=redis 时使用)
    pub redis_url: Option<String>,
    /// 链接发现缓存有效期（小时）
    pub discovery_ttl_hours: u64,
}

/// 允许的轮询间隔范围（秒）
pub const POLL_INTERVAL_RANGE_SECS: std::ops::RangeInclusive<u64> = 3..=5;

/// 任务轮询配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    /// 轮询间隔（秒）
    pub interval_secs: u64,
    /// 单URL任务最长等待（秒）
    pub single_max_wait_secs: u64,
    /// Agent 任务最长等待（秒）
    pub agent_max_wait_secs: u64,
}

/// 限流重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// 最大重试次数
    pub max_retries: u32,
    /// 初始退避（毫秒）
    pub initial_backoff_ms: u64,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 是否给退避加随机抖动
    pub enable_jitter: bool,
    /// 抖动因子 (0.0-1.0)
    pub jitter_factor: f64,
}

/// 并发控制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencySettings {
    /// AI 批量抽取的工作者数量
    pub ai_workers: usize,
    /// 本地/启发式抽取的工作者数量
    pub local_workers: usize,
    /// 单批次最多处理的URL数（额度预算）
    pub max_batch_items: usize,
}

/// 污染清理配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ContaminationSettings {
    pub materials_min_len: usize,
    pub materials_min_group: usize,
    pub description_min_len: usize,
    pub description_min_group: usize,
    pub unique_description_min_len: usize,
    pub title_token_min_len: usize,
    pub title_min_len: usize,
    pub unique_description_weight: i32,
    pub title_token_weight: i32,
    pub title_match_weight: i32,
    pub slug_match_weight: i32,
    pub unique_materials_weight: i32,
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启动 Prometheus 导出器
    pub enabled: bool,
    /// 导出器监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `ARTWORKRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("ARTWORKRS").separator("__"));

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 校验取值范围
    ///
    /// 轮询间隔必须落在 3-5 秒，抖动因子必须在 0.0-1.0 之间
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !POLL_INTERVAL_RANGE_SECS.contains(&self.polling.interval_secs) {
            return Err(ConfigError::Message(format!(
                "polling.interval_secs must be between {} and {}, got {}",
                POLL_INTERVAL_RANGE_SECS.start(),
                POLL_INTERVAL_RANGE_SECS.end(),
                self.polling.interval_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter_factor) {
            return Err(ConfigError::Message(format!(
                "retry.jitter_factor must be between 0.0 and 1.0, got {}",
                self.retry.jitter_factor
            )));
        }
        Ok(())
    }

    /// 只使用内置默认值
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            // Extraction service
            .set_default("service.base_url", "https://api.firecrawl.dev")?
            .set_default("service.request_timeout_secs", 30)?
            // Rate limiting
            .set_default("rate_limiting.calls_per_minute", 10)?
            // Cache
            .set_default("cache.enabled", true)?
            .set_default("cache.backend", "local")?
            .set_default("cache.local_path", ".cache")?
            .set_default("cache.discovery_ttl_hours", 24)?
            // Polling
            .set_default("polling.interval_secs", 5)?
            .set_default("polling.single_max_wait_secs", 180)?
            .set_default("polling.agent_max_wait_secs", 600)?
            // Retry on 429
            .set_default("retry.max_retries", 3)?
            .set_default("retry.initial_backoff_ms", 1000)?
            .set_default("retry.backoff_multiplier", 2.0)?
            .set_default("retry.enable_jitter", false)?
            .set_default("retry.jitter_factor", 0.1)?
            // Concurrency
            .set_default("concurrency.ai_workers", 3)?
            .set_default("concurrency.local_workers", 2)?
            .set_default("concurrency.max_batch_items", 50)?
            // Contamination cleaner
            .set_default("contamination.materials_min_len", 15)?
            .set_default("contamination.materials_min_group", 3)?
            .set_default("contamination.description_min_len", 30)?
            .set_default("contamination.description_min_group", 2)?
            .set_default("contamination.unique_description_min_len", 50)?
            .set_default("contamination.title_token_min_len", 3)?
            .set_default("contamination.title_min_len", 2)?
            .set_default("contamination.unique_description_weight", 10)?
            .set_default("contamination.title_token_weight", 5)?
            .set_default("contamination.title_match_weight", 10)?
            .set_default("contamination.slug_match_weight", 8)?
            .set_default("contamination.unique_materials_weight", 5)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
