// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：作品记录、抽取任务与批次统计
/// - 仓库接口（repositories）：缓存条目的持久化抽象
/// - 服务（services）：完整性判定、启发式推断与污染清理
///
/// 领域层不依赖于任何外部服务实现。
pub mod models;
pub mod repositories;
pub mod services;
