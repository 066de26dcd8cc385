// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::models::record::Record;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::infrastructure::cache::cache_keys;
use crate::utils::errors::ExtractionError;

/// 缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// 写入时间
    pub written_at: DateTime<Utc>,
    /// 负载（记录或链接列表）
    pub payload: T,
}

/// 缓存存储
///
/// 在键值存储之上提供三个命名空间：
/// - 普通：URL → 最终合并记录
/// - 抽取级别：URL + 提示词 → 记录
/// - 链接发现：种子URL + 模式 → 链接列表，带 TTL
///
/// 任何读取或解析错误都按未命中处理，写入错误只记录日志。
#[derive(Clone)]
pub struct CacheStore {
    storage: Arc<dyn StorageRepository>,
    enabled: bool,
}

impl CacheStore {
    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self {
            storage,
            enabled: true,
        }
    }

    /// 关闭缓存：读取总是未命中，写入被忽略
    pub fn disabled(storage: Arc<dyn StorageRepository>) -> Self {
        Self {
            storage,
            enabled: false,
        }
    }

    async fn load_entry<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<CacheEntry<T>>, ExtractionError> {
        let bytes = match self.storage.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => return Err(ExtractionError::CacheCorruption(e.to_string())),
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                // 无法解析的条目直接清除，下次写入时重建
                if let Err(delete_err) = self.storage.delete(key).await {
                    warn!("Failed to evict corrupted cache entry {}: {}", key, delete_err);
                }
                Err(ExtractionError::CacheCorruption(e.to_string()))
            }
        }
    }

    async fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        if !self.enabled {
            return None;
        }
        match self.load_entry(key).await {
            Ok(Some(entry)) => {
                metrics::counter!("extraction_cache_hits_total").increment(1);
                Some(entry)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Treating cache entry {} as a miss: {}", key, e);
                None
            }
        }
    }

    /// 读取任意键
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.read_entry(key).await.map(|entry| entry.payload)
    }

    /// 写入任意键（覆盖）
    pub async fn put<T: Serialize>(&self, key: &str, payload: &T) {
        if !self.enabled {
            return;
        }
        let entry = CacheEntry {
            written_at: Utc::now(),
            payload,
        };
        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize cache entry {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.storage.save(key, &bytes).await {
            warn!("Failed to write cache entry {}: {}", key, e);
        }
    }

    /// 条目存在、可解析且年龄小于 `ttl`
    pub async fn is_valid(&self, key: &str, ttl: Duration) -> bool {
        self.read_entry::<serde_json::Value>(key)
            .await
            .is_some_and(|entry| is_fresh(entry.written_at, ttl))
    }

    /// 读取仍在有效期内的条目
    pub async fn get_fresh<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let entry = self.read_entry::<T>(key).await?;
        if is_fresh(entry.written_at, ttl) {
            Some(entry.payload)
        } else {
            debug!("Cache entry {} expired", key);
            None
        }
    }

    pub async fn get_record(&self, url: &str) -> Option<Record> {
        self.get(&cache_keys::record_key(url)).await
    }

    pub async fn put_record(&self, record: &Record) {
        self.put(&cache_keys::record_key(&record.url), record).await
    }

    pub async fn get_extraction(&self, url: &str, prompt: &str) -> Option<Record> {
        self.get(&cache_keys::extraction_key(url, prompt)).await
    }

    pub async fn put_extraction(&self, url: &str, prompt: &str, record: &Record) {
        self.put(&cache_keys::extraction_key(url, prompt), record)
            .await
    }

    pub async fn get_discovery(&self, seed_url: &str, mode: &str, ttl: Duration) -> Option<Vec<String>> {
        self.get_fresh(&cache_keys::discovery_key(seed_url, mode), ttl)
            .await
    }

    /// 只缓存非空的链接列表
    pub async fn put_discovery(&self, seed_url: &str, mode: &str, links: &[String]) {
        if links.is_empty() {
            return;
        }
        self.put(&cache_keys::discovery_key(seed_url, mode), &links)
            .await
    }
}

fn is_fresh(written_at: DateTime<Utc>, ttl: Duration) -> bool {
    let age = Utc::now().signed_duration_since(written_at);
    // 写入时间在未来（时钟回拨）按新鲜处理
    match age.to_std() {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}
