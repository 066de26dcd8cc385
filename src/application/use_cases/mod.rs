// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// 每个用例代表一个完整的抽取流程
pub mod agent_search;
pub mod batch_extract;
pub mod discover_links;
pub mod tiered_batch;
