// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 异步任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// 针对已知URL的结构化抽取
    Extract,
    /// 开放式 Agent 搜索
    Agent,
}

impl JobKind {
    /// 服务端点路径
    pub fn path(&self) -> &'static str {
        match self {
            JobKind::Extract => "/v2/extract",
            JobKind::Agent => "/v2/agent",
        }
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Submitted,
    Processing,
    Completed,
    Failed,
    Timeout,
}

impl JobStatus {
    /// 解析服务返回的状态字符串
    ///
    /// 未知状态按处理中对待，继续轮询
    pub fn from_service(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "completed" => JobStatus::Completed,
            "failed" | "cancelled" => JobStatus::Failed,
            "submitted" | "pending" | "queued" => JobStatus::Submitted,
            _ => JobStatus::Processing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Submitted => "submitted",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Timeout => "timeout",
        }
    }

    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Timeout
        )
    }
}

/// 抽取任务
///
/// 由提交创建，此后只由轮询响应推进；终止状态被调用方消费后即丢弃。
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    /// 任务ID（同步完成时没有）
    pub id: Option<String>,
    /// 任务类型
    pub kind: JobKind,
    /// 提交时间
    pub submitted_at: DateTime<Utc>,
    /// 当前状态
    pub status: JobStatus,
    /// 完成时的原始负载（单个对象或列表）
    pub payload: Option<Value>,
    /// 服务报告的消耗额度
    pub credits_used: Option<Value>,
    /// 失败信息
    pub failure: Option<String>,
}

impl ExtractionJob {
    /// 已拿到任务ID、等待轮询的任务
    pub fn submitted(kind: JobKind, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            kind,
            submitted_at: Utc::now(),
            status: JobStatus::Submitted,
            payload: None,
            credits_used: None,
            failure: None,
        }
    }

    /// 服务同步返回结果的任务
    pub fn completed_inline(kind: JobKind, payload: Value) -> Self {
        Self {
            id: None,
            kind,
            submitted_at: Utc::now(),
            status: JobStatus::Completed,
            payload: Some(payload),
            credits_used: None,
            failure: None,
        }
    }

    /// 应用一次轮询响应
    pub fn apply_poll(
        &mut self,
        status: JobStatus,
        data: Option<Value>,
        credits_used: Option<Value>,
        failure: Option<String>,
    ) {
        if self.status.is_terminal() {
            return;
        }
        self.status = status;
        match status {
            JobStatus::Completed => {
                self.payload = data;
                self.credits_used = credits_used;
            }
            JobStatus::Failed => {
                self.failure = failure.or_else(|| Some("job failed".to_string()));
            }
            _ => {}
        }
    }

    /// 等待预算耗尽
    pub fn mark_timeout(&mut self) {
        if !self.status.is_terminal() {
            self.status = JobStatus::Timeout;
        }
    }

    /// 把负载统一展开为条目列表
    pub fn payload_items(&self) -> Vec<Value> {
        match &self.payload {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        }
    }
}
