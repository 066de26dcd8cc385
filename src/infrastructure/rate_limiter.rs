// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// 付费调用的速率限制器
///
/// 保证任意两次放行之间至少间隔 `60 / calls_per_minute` 秒。
/// 所有工作者共享同一个实例；不保证等待者的先后顺序。
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(calls_per_minute: u32) -> Self {
        let calls_per_minute = calls_per_minute.max(1);
        Self {
            interval: Duration::from_secs_f64(60.0 / calls_per_minute as f64),
            last_call: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 等待直到允许下一次调用，并记录本次调用时间
    pub async fn wait(&self) {
        // 锁在睡眠期间保持持有，后来者排在当前调用之后
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let next_allowed = previous + self.interval;
            if next_allowed > Instant::now() {
                debug!(
                    "Rate limiter sleeping {:?}",
                    next_allowed.saturating_duration_since(Instant::now())
                );
                sleep_until(next_allowed).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
