// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作管理模块
///
/// 有界并发地在一批URL上运行抽取任务
pub mod manager;
