// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod agent_search_test;
pub mod batch_extract_test;
pub mod discover_links_test;
pub mod helpers;
pub mod tiered_batch_test;
