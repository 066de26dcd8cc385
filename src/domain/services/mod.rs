// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含不依赖外部服务的纯业务规则：
/// - 完整性策略（completeness）：决定某一层的结果是否足够
/// - 污染清理（contamination_cleaner）：修复批次内被错误共享的字段
/// - 字段归位（field_normalizer）：把错放的尺寸、时长、署名移回各自字段
/// - 启发式（heuristics）：从 markdown 快照推断字段
/// - 本地解析（local_parser）：零成本的 HTML 解析
pub mod completeness;
pub mod contamination_cleaner;
pub mod field_normalizer;
pub mod heuristics;
pub mod local_parser;
