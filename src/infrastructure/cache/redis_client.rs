// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};

const KEY_PREFIX: &str = "artworkrs:";

/// Redis 存储
///
/// 把缓存条目存为 Redis 字符串，多个进程可以共享同一份缓存
#[derive(Clone)]
pub struct RedisStorage {
    /// Redis客户端
    client: redis::Client,
}

impl RedisStorage {
    /// 创建新的Redis存储实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisStorage)` - 存储实例（连接在首次使用时建立）
    /// * `Err(StorageError)` - URL 无效
    pub fn new(redis_url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url).map_err(backend_error)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend_error)
    }
}

fn backend_error(e: redis::RedisError) -> StorageError {
    StorageError::Backend(e.to_string())
}

fn namespaced(key: &str) -> String {
    format!("{}{}", KEY_PREFIX, key)
}

#[async_trait]
impl StorageRepository for RedisStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let mut con = self.connection().await?;
        con.set::<_, _, ()>(namespaced(key), data)
            .await
            .map_err(backend_error)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut con = self.connection().await?;
        con.get(namespaced(key)).await.map_err(backend_error)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut con = self.connection().await?;
        con.del::<_, ()>(namespaced(key)).await.map_err(backend_error)
    }
}
