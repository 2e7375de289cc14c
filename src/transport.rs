//! HTTP transport abstraction
//!
//! The client never talks to `reqwest` directly. It hands a fully built
//! [`TransportRequest`] to a [`ChatTransport`] and gets back a status code and
//! the raw body as a stream of byte chunks. [`ReqwestTransport`] is the
//! production implementation; tests inject synthetic ones.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use std::pin::Pin;

use crate::config::ClientConfig;
use crate::error::{ChatError, Result};

/// Raw response body, delivered in arbitrarily sized chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Transport-level request data for a JSON POST.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// Transport-level response data.
pub struct TransportResponse {
    pub status: u16,
    pub body: ByteStream,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Sends a streaming chat request.
///
/// Implementations must return as soon as the status line and headers are
/// known; the body is consumed lazily through [`TransportResponse::body`].
/// Connection failures map to [`ChatError::Transport`].
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_stream(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// [`ChatTransport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing client (shares its connection pool).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client honouring the timeouts and user agent of `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ChatError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl ChatTransport for ReqwestTransport {
    async fn post_stream(&self, request: TransportRequest) -> Result<TransportResponse> {
        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ChatError::from));

        Ok(TransportResponse {
            status,
            body: Box::pin(body),
        })
    }
}
