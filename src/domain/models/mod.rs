// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心数据结构，包括：
/// - 作品记录（record）：一个页面抽取出的作品元数据
/// - 抽取任务（job）：抽取服务上的异步任务状态
/// - 批次（batch）：单URL结果、批次统计与最终结果
/// - 抽取级别（extraction_level）：schema 与提示词模板
pub mod batch;
pub mod extraction_level;
pub mod job;
pub mod record;
