// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 错误类型模块
pub mod errors;

/// 重试策略模块
pub mod retry_policy;

/// 日志初始化模块
pub mod telemetry;
