// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 缓存键、缓存存储与Redis后端
pub mod cache;

/// 抽取服务模块
///
/// 外部抽取服务的客户端与任务轮询
pub mod extraction_api;

/// 指标模块
pub mod metrics;

/// 速率限制模块
pub mod rate_limiter;

/// 存储模块
///
/// 本地文件与内存存储实现
pub mod storage;
