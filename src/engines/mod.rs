// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod ai_tier;
pub mod heuristic_tier;
pub mod local_tier;
pub mod reqwest_engine;
pub mod tiered_extractor;
pub mod traits;
