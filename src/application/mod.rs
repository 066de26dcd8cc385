// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 把领域服务、抽取层与基础设施组装成完整的抽取流程
pub mod context;
pub mod use_cases;
