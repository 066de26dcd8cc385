// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use thiserror::Error;

/// 抽取服务与任务错误类型
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 服务限流 (HTTP 429)，可退避重试
    #[error("rate limited by extraction service")]
    TransientRateLimit,

    /// 提交被拒绝
    #[error("submit failed ({status}): {message}")]
    SubmitFailure { status: u16, message: String },

    /// 任务在服务端失败
    #[error("job failed: {0}")]
    JobFailed(String),

    /// 轮询等待超出预算
    #[error("job timed out after {0:?}")]
    JobTimeout(Duration),

    /// 任务完成但没有可用内容
    #[error("extraction returned no usable content")]
    EmptyExtraction,

    /// 缓存条目损坏（调用方总是把它当作未命中）
    #[error("cache entry corrupted: {0}")]
    CacheCorruption(String),

    /// 网络或传输层错误
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 响应无法解析
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// 缺少凭据
    #[error("extraction service credentials are not configured")]
    MissingCredentials,

    /// 配置无效
    #[error("configuration error: {0}")]
    Config(String),
}

impl ExtractionError {
    /// 是否是可退避重试的限流错误
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ExtractionError::TransientRateLimit)
    }

    /// 批次级别的配置错误，应该向调用方传播
    ///
    /// 包括凭据缺失、配置无效，以及服务以 401/403 拒绝密钥
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            ExtractionError::MissingCredentials
                | ExtractionError::Config(_)
                | ExtractionError::SubmitFailure {
                    status: 401 | 403,
                    ..
                }
        )
    }
}
