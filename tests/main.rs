// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 测试主模块
///
/// 集成测试用 wiremock 模拟抽取服务和作品页面，覆盖完整的抽取流程
mod integration;
