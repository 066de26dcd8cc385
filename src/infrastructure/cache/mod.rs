// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 提供缓存键生成、三命名空间的缓存存储以及Redis后端
pub mod cache_keys;
pub mod cache_store;
pub mod redis_client;
