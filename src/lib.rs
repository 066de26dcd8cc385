// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 把各层组装成批量抽取、分层抽取、Agent 搜索和链接发现流程
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含作品记录、任务模型与纯逻辑服务
pub mod domain;

/// 引擎模块
///
/// 实现本地、启发式和 AI 三个抽取层以及分层抽取器
pub mod engines;

/// 基础设施模块
///
/// 提供抽取服务客户端、缓存、存储、速率限制和指标
pub mod infrastructure;

/// 工具模块
///
/// 提供错误类型、重试策略和日志初始化
pub mod utils;

/// 工作器模块
///
/// 有界并发的任务分发
pub mod workers;
