// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::*;

#[test]
fn test_defaults_loaded() {
    let settings = Settings::defaults().expect("defaults should deserialize");

    assert_eq!(settings.rate_limiting.calls_per_minute, 10);
    assert_eq!(settings.polling.interval_secs, 5);
    assert_eq!(settings.polling.single_max_wait_secs, 180);
    assert_eq!(settings.polling.agent_max_wait_secs, 600);
    assert_eq!(settings.retry.max_retries, 3);
    assert_eq!(settings.concurrency.ai_workers, 3);
    assert_eq!(settings.concurrency.max_batch_items, 50);
    assert_eq!(settings.cache.discovery_ttl_hours, 24);
    assert!(settings.service.api_key.is_none());
    assert!(!settings.metrics.enabled);
}

#[test]
fn test_contamination_defaults() {
    let settings = Settings::defaults().expect("defaults should deserialize");
    let c = settings.contamination;

    assert_eq!(c.materials_min_len, 15);
    assert_eq!(c.materials_min_group, 3);
    assert_eq!(c.description_min_len, 30);
    assert_eq!(c.description_min_group, 2);
    assert_eq!(c.unique_description_min_len, 50);
    assert_eq!(
        (
            c.unique_description_weight,
            c.title_token_weight,
            c.title_match_weight,
            c.slug_match_weight,
            c.unique_materials_weight
        ),
        (10, 5, 10, 8, 5)
    );
}

#[test]
fn test_retry_jitter_defaults() {
    let settings = Settings::defaults().expect("defaults should deserialize");

    assert!(!settings.retry.enable_jitter);
    assert_eq!(settings.retry.jitter_factor, 0.1);
}

#[test]
fn test_validate_poll_interval_range() {
    let mut settings = Settings::defaults().expect("defaults should deserialize");
    assert!(settings.validate().is_ok());

    settings.polling.interval_secs = 3;
    assert!(settings.validate().is_ok());

    settings.polling.interval_secs = 0;
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("polling.interval_secs"));

    settings.polling.interval_secs = 6;
    assert!(settings.validate().is_err());
}

#[test]
fn test_validate_jitter_factor() {
    let mut settings = Settings::defaults().expect("defaults should deserialize");
    settings.retry.jitter_factor = 1.5;

    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("retry.jitter_factor"));
}
