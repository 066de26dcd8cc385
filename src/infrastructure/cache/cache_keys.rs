// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 缓存键
//!
//! 所有键都是 (身份, 区分符) 的纯函数，输出只含 `[0-9a-z_]`，可直接作为文件名。

use sha2::{Digest, Sha256};

/// 提示词哈希保留的前缀长度
const PROMPT_HASH_PREFIX: usize = 8;

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// URL 哈希
pub fn url_hash(url: &str) -> String {
    sha256_hex(url)
}

/// 最终合并记录的键
pub fn record_key(url: &str) -> String {
    url_hash(url)
}

/// 抽取级别缓存的键：同一URL不同提示词互不覆盖
pub fn extraction_key(url: &str, prompt: &str) -> String {
    let prompt_hash = sha256_hex(prompt);
    format!(
        "extract_{}_{}",
        url_hash(url),
        &prompt_hash[..PROMPT_HASH_PREFIX]
    )
}

/// 链接发现缓存的键
pub fn discovery_key(seed_url: &str, mode: &str) -> String {
    let mode: String = mode
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("discovery_{}_{}", url_hash(seed_url), mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_deterministic() {
        assert_eq!(record_key("https://a.com/x"), record_key("https://a.com/x"));
        assert_ne!(record_key("https://a.com/x"), record_key("https://a.com/y"));
        assert_eq!(url_hash("abc").len(), 64);
    }

    #[test]
    fn test_extraction_key_discriminates_prompt() {
        let quick = extraction_key("https://a.com/x", "quick prompt");
        let full = extraction_key("https://a.com/x", "full prompt");

        assert_ne!(quick, full);
        assert!(quick.starts_with("extract_"));
        // extract_ + 64 + _ + 8
        assert_eq!(quick.len(), 8 + 64 + 1 + PROMPT_HASH_PREFIX);
    }

    #[test]
    fn test_discovery_key_includes_mode() {
        let key = discovery_key("https://a.com", "Horizontal");
        assert!(key.ends_with("_horizontal"));
        assert_ne!(key, discovery_key("https://a.com", "auto"));
    }
}
