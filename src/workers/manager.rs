// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// 单个URL任务的结果
#[derive(Debug)]
pub struct TaskResult<T> {
    /// 输入URL
    pub url: String,
    /// 任务输出；任务 panic 或被取消时为错误描述
    pub output: Result<T, String>,
}

/// 并发管理器
///
/// 用固定数量的工作者在一组URL上运行同一个任务。
/// 结果按完成顺序收集；单个任务的 panic 只影响它自己的URL。
#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyManager {
    workers: usize,
}

impl ConcurrencyManager {
    /// 创建工作管理器
    ///
    /// # 参数
    ///
    /// * `workers` - 同时运行的任务上限（至少为1）
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 在所有URL上运行任务并等待全部结束
    ///
    /// 返回的条目数总是等于输入URL数
    pub async fn run<F, Fut, T>(&self, urls: Vec<String>, task: F) -> Vec<TaskResult<T>>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let task = Arc::new(task);
        let mut join_set = JoinSet::new();
        let mut urls_by_task = HashMap::with_capacity(urls.len());

        for url in urls {
            let semaphore = semaphore.clone();
            let task = task.clone();
            let task_url = url.clone();
            let handle = join_set.spawn(async move {
                // 信号量不会被关闭
                let _permit = semaphore.acquire_owned().await.ok();
                debug!("Worker picked up {}", task_url);
                task(task_url).await
            });
            urls_by_task.insert(handle.id(), url);
        }

        let mut results = Vec::with_capacity(urls_by_task.len());
        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((id, output)) => {
                    if let Some(url) = urls_by_task.remove(&id) {
                        results.push(TaskResult {
                            url,
                            output: Ok(output),
                        });
                    }
                }
                Err(join_error) => {
                    if let Some(url) = urls_by_task.remove(&join_error.id()) {
                        error!("Task for {} aborted: {}", url, join_error);
                        results.push(TaskResult {
                            url,
                            output: Err(join_error.to_string()),
                        });
                    }
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://example.com/{}", i)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_url_accounted_with_bounded_workers() {
        let manager = ConcurrencyManager::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (running_c, peak_c) = (running.clone(), peak.clone());
        let results = manager
            .run(urls(10), move |url| {
                let running = running_c.clone();
                let peak = peak_c.clone();
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    url.len()
                }
            })
            .await;

        assert_eq!(results.len(), 10);
        let distinct: HashSet<_> = results.iter().map(|r| r.url.clone()).collect();
        assert_eq!(distinct.len(), 10);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(results.iter().all(|r| r.output.is_ok()));
    }

    #[tokio::test]
    async fn test_panic_is_isolated_to_its_url() {
        let manager = ConcurrencyManager::new(2);

        let results = manager
            .run(urls(5), |url| async move {
                if url.ends_with("/3") {
                    panic!("injected failure");
                }
                url
            })
            .await;

        assert_eq!(results.len(), 5);
        let failed: Vec<_> = results.iter().filter(|r| r.output.is_err()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].url, "https://example.com/3");
    }

    #[test]
    fn test_zero_workers_is_clamped() {
        assert_eq!(ConcurrencyManager::new(0).workers(), 1);
    }
}
