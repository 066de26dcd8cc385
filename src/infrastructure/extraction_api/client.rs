// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::settings::ServiceSettings;
use crate::domain::models::job::{JobKind, JobStatus};
use crate::utils::errors::ExtractionError;

/// 错误信息里保留的响应体长度
const ERROR_BODY_LIMIT: usize = 200;

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResponse {
    /// 异步任务已接受，需要轮询
    Accepted { id: String },
    /// 服务同步返回了结果
    Completed(Value),
}

/// 单次轮询结果
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    pub status: JobStatus,
    pub data: Option<Value>,
    pub credits_used: Option<Value>,
    pub error: Option<String>,
}

/// 抽取服务接口
#[async_trait]
pub trait ExtractionApi: Send + Sync {
    /// 提交一个抽取/Agent 任务
    async fn submit(&self, kind: JobKind, body: &Value) -> Result<SubmitResponse, ExtractionError>;

    /// 查询任务状态
    async fn poll(&self, kind: JobKind, id: &str) -> Result<PollResponse, ExtractionError>;

    /// 同步抓取（快照或带动作的抓取），返回响应中的 `data`
    async fn scrape(&self, body: &Value) -> Result<Value, ExtractionError>;
}

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    #[serde(default)]
    success: bool,
    id: Option<String>,
    status: Option<String>,
    data: Option<Value>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PollEnvelope {
    #[serde(default)]
    status: String,
    data: Option<Value>,
    credits_used: Option<Value>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<Value>,
    error: Option<String>,
}

/// 基于reqwest的抽取服务客户端
pub struct HttpExtractionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpExtractionClient {
    /// 根据服务配置创建客户端
    pub fn new(settings: &ServiceSettings) -> Result<Self, ExtractionError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("artworkrs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        let base_url = settings.base_url.trim_end_matches('/').to_string();
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(ExtractionError::Config(format!(
                "invalid service base_url: {}",
                settings.base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            api_key: settings
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, ExtractionError> {
        self.api_key
            .as_deref()
            .ok_or(ExtractionError::MissingCredentials)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response, ExtractionError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(self.api_key()?)
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }
}

/// 429 映射为可重试的限流错误，其它非 2xx 映射为提交失败
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ExtractionError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ExtractionError::TransientRateLimit);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ExtractionError::SubmitFailure {
            status: status.as_u16(),
            message: truncate(&body, ERROR_BODY_LIMIT),
        });
    }
    Ok(response)
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[async_trait]
impl ExtractionApi for HttpExtractionClient {
    async fn submit(&self, kind: JobKind, body: &Value) -> Result<SubmitResponse, ExtractionError> {
        let response = self.post_json(kind.path(), body).await?;
        let envelope: SubmitEnvelope = response
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
        interpret_submit(envelope)
    }

    async fn poll(&self, kind: JobKind, id: &str) -> Result<PollResponse, ExtractionError> {
        let response = self
            .http
            .get(self.endpoint(&format!("{}/{}", kind.path(), id)))
            .bearer_auth(self.api_key()?)
            .send()
            .await?;
        let envelope: PollEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;

        Ok(PollResponse {
            status: JobStatus::from_service(&envelope.status),
            data: envelope.data,
            credits_used: envelope.credits_used,
            error: envelope.error,
        })
    }

    async fn scrape(&self, body: &Value) -> Result<Value, ExtractionError> {
        let response = self.post_json("/v2/scrape", body).await?;
        let envelope: ScrapeEnvelope = response
            .json()
            .await
            .map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;

        if !envelope.success {
            return Err(ExtractionError::SubmitFailure {
                status: StatusCode::OK.as_u16(),
                message: envelope.error.unwrap_or_else(|| "scrape unsuccessful".to_string()),
            });
        }
        envelope
            .data
            .ok_or_else(|| ExtractionError::InvalidResponse("scrape response without data".into()))
    }
}

fn interpret_submit(envelope: SubmitEnvelope) -> Result<SubmitResponse, ExtractionError> {
    if !envelope.success {
        return Err(ExtractionError::SubmitFailure {
            status: StatusCode::OK.as_u16(),
            message: envelope
                .error
                .unwrap_or_else(|| "service reported success=false".to_string()),
        });
    }

    let inline_completed = envelope
        .status
        .as_deref()
        .is_some_and(|s| JobStatus::from_service(s) == JobStatus::Completed);
    if inline_completed {
        if let Some(data) = envelope.data {
            return Ok(SubmitResponse::Completed(data));
        }
    }

    match envelope.id {
        Some(id) if !id.is_empty() => Ok(SubmitResponse::Accepted { id }),
        _ => Err(ExtractionError::InvalidResponse(
            "submit response carries neither id nor inline data".to_string(),
        )),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
