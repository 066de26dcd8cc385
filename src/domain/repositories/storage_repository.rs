// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 后端错误（Redis 等）
    #[error("Storage backend error: {0}")]
    Backend(String),
    /// 不支持的配置
    #[error("Unsupported storage backend: {0}")]
    Unsupported(String),
}

/// 缓存条目的持久化接口
///
/// 键由缓存层生成，已经是文件名安全的字符串
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 写入（覆盖）一个键
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 读取一个键，不存在时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 删除一个键，不存在时视为成功
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
