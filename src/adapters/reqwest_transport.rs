//! Reqwest-based chat transport.
//!
//! Production implementation of [`ChatTransport`] against the answer
//! service's `/chat/stream`, `/chat` and `/health` endpoints.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::error::{classify_reqwest_error, StreamError};
use crate::models::{ChatRequest, ChatResponse, HealthResponse};
use crate::traits::{ByteStream, ChatTransport};

/// Chat transport implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use ragchat::adapters::ReqwestTransport;
/// use ragchat::config::ClientConfig;
///
/// let transport = ReqwestTransport::new(ClientConfig::default())?;
/// let healthy = transport.health().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// Build a client honouring the configured connect timeout.
    pub fn new(config: ClientConfig) -> Result<Self, StreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| StreamError::Connection {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// Create a transport around an existing reqwest client.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Turn a non-2xx response into [`StreamError::Transport`], using the
    /// body text as detail.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StreamError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(status, %detail, "Answer service returned an error status");
        Err(StreamError::Transport { status, detail })
    }
}

#[async_trait]
impl ChatTransport for ReqwestTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, StreamError> {
        let url = self.config.stream_url();
        tracing::info!(%url, history_len = request.history.len(), "Opening chat stream");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "text/event-stream")
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;

        let response = Self::check_status(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Err(StreamError::NoBody);
        }

        let stream = response.bytes_stream().map(move |result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    StreamError::Timeout { url: url.clone() }
                } else {
                    StreamError::Read {
                        message: e.to_string(),
                    }
                }
            })
        });

        Ok(Box::pin(stream))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, StreamError> {
        let url = self.config.chat_url();
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;

        let response = Self::check_status(response).await?;
        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| StreamError::Decode {
                message: e.to_string(),
            })
    }

    async fn health(&self) -> Result<bool, StreamError> {
        let url = self.config.health_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, &url))?;

        if !response.status().is_success() {
            return Ok(false);
        }
        let health = response
            .json::<HealthResponse>()
            .await
            .map_err(|e| StreamError::Decode {
                message: e.to_string(),
            })?;
        Ok(health.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_keeps_config() {
        let config = ClientConfig::default().with_base_url("http://localhost:1234");
        let transport = ReqwestTransport::new(config.clone()).unwrap();
        assert_eq!(transport.config(), &config);
    }

    #[test]
    fn test_with_custom_client() {
        let custom = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        let transport = ReqwestTransport::with_client(custom, ClientConfig::default());
        assert_eq!(
            transport.config().stream_url(),
            "http://127.0.0.1:8000/chat/stream"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_error() {
        // Port 9 (discard) is closed on test machines.
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_connect_timeout(Duration::from_secs(2));
        let transport = ReqwestTransport::new(config).unwrap();
        let err = match transport.open_stream(&ChatRequest::new("hi")).await {
            Ok(_) => panic!("Expected an error"),
            Err(e) => e,
        };
        assert!(!err.is_cancellation());
        assert_eq!(err.user_message(), crate::error::GENERIC_FAILURE_NOTICE);
    }
}
