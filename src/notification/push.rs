//! Push gateway client
//!
//! Best-effort delivery to an external FCM-style messaging gateway. No
//! delivery guarantee is assumed; callers treat every failure as
//! non-fatal.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

/// Request timeout for gateway calls
const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// A push payload addressed by an opaque device token
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
}

#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Send to a single recipient
    async fn send(&self, token: &str, message: &PushMessage) -> ApiResult<()>;

    /// Send the same message to many recipients; returns the number of
    /// recipients the gateway reported as delivered
    async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> ApiResult<usize>;
}

/// HTTP client for the push gateway
pub struct HttpPushGateway {
    client: reqwest::Client,
    url: String,
    server_key: String,
}

#[derive(Deserialize)]
struct MulticastResponse {
    #[serde(default)]
    success: usize,
}

impl HttpPushGateway {
    pub fn new(url: String, server_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(PUSH_TIMEOUT)
            .build()
            .expect("failed to build push gateway client");

        Self {
            client,
            url,
            server_key,
        }
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send(&self, token: &str, message: &PushMessage) -> ApiResult<()> {
        let payload = json!({
            "to": token,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "data": message.data,
            "priority": "high",
        });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::ExternalService(format!(
                "Push gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> ApiResult<usize> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let payload = json!({
            "registration_ids": tokens,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "data": message.data,
        });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::ExternalService(format!(
                "Push gateway returned {}",
                response.status()
            )));
        }

        let body: MulticastResponse = response.json().await?;
        Ok(body.success)
    }
}

/// Gateway used when no push endpoint is configured; drops everything
pub struct NullPushGateway;

#[async_trait]
impl PushGateway for NullPushGateway {
    async fn send(&self, _token: &str, message: &PushMessage) -> ApiResult<()> {
        tracing::debug!(title = %message.title, "Push gateway not configured, dropping notification");
        Ok(())
    }

    async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> ApiResult<usize> {
        tracing::debug!(
            recipients = tokens.len(),
            title = %message.title,
            "Push gateway not configured, dropping notifications"
        );
        Ok(0)
    }
}
