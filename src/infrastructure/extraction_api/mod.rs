// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抽取服务模块
///
/// 服务客户端、异步任务的提交/轮询协议以及滚动链接发现
pub mod client;
pub mod job_poller;
pub mod link_discoverer;
