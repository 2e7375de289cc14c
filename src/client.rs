//! Streaming chat client
//!
//! [`StreamingChatClient`] turns a conversation snapshot into a streamed
//! chat-completion request and decodes the reply into text fragments as they
//! arrive.
//!
//! ```rust,no_run
//! use chatstream::prelude::*;
//!
//! # async fn example() -> Result<(), ChatError> {
//! let client = StreamingChatClient::new(ClientConfig::new("sk-..."))?;
//! let history = vec![user!("Hello!")];
//!
//! let reply = client
//!     .send(&history, |fragment| print!("{fragment}"))
//!     .await?;
//! println!("\nfull reply: {reply}");
//! # Ok(())
//! # }
//! ```

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{ClientConfig, validate_endpoint};
use crate::defaults;
use crate::error::{ChatError, Result};
use crate::request::OutboundRequest;
use crate::streaming::{FragmentStream, FragmentStreamHandle, decode_body};
use crate::transport::{ByteStream, ChatTransport, ReqwestTransport, TransportRequest};
use crate::types::Message;
use crate::utils::cancel::{CancelHandle, cancellable};
use crate::utils::mask_secret;

const TARGET: &str = "chatstream::http";

/// Per-call request target: the model, credentials and URL to use.
#[derive(Clone, Copy)]
pub struct RequestTarget<'a> {
    pub model: &'a str,
    pub api_key: &'a str,
    pub endpoint: &'a str,
}

impl std::fmt::Debug for RequestTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestTarget")
            .field("model", &self.model)
            .field("api_key", &mask_secret(self.api_key))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Client for OpenAI-compatible streaming chat completions.
///
/// At most one request may be in flight per client; a second concurrent
/// `send`/`stream` fails with [`ChatError::Busy`].
pub struct StreamingChatClient {
    config: ClientConfig,
    transport: Arc<dyn ChatTransport>,
    in_flight: Arc<AtomicBool>,
}

static_assertions::assert_impl_all!(StreamingChatClient: Send, Sync);

impl StreamingChatClient {
    /// Create a client that talks HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::from_parts(config, Arc::new(transport)))
    }

    /// Create a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn ChatTransport>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, transport))
    }

    fn from_parts(config: ClientConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            config,
            transport,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Switch the model used by subsequent requests.
    ///
    /// Any non-blank id is accepted; compatible endpoints often serve models
    /// outside [`known_models`](Self::known_models).
    pub fn set_model(&mut self, model: impl Into<String>) -> Result<()> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(ChatError::Configuration("model is empty".to_string()));
        }
        if !Self::is_known_model(&model) {
            tracing::debug!(target: TARGET, model = %model, "using a model outside the known list");
        }
        self.config.model = model;
        Ok(())
    }

    /// Models offered for selection, default first.
    pub fn known_models() -> Vec<&'static str> {
        let mut models = vec![defaults::chat::MODEL];
        models.extend(
            defaults::chat::KNOWN_MODELS
                .iter()
                .copied()
                .filter(|m| *m != defaults::chat::MODEL),
        );
        models
    }

    pub fn is_known_model(model: &str) -> bool {
        defaults::chat::KNOWN_MODELS.contains(&model)
    }

    /// Whether a request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send `history` and stream the reply.
    ///
    /// `on_fragment` is called synchronously for every content fragment, in
    /// arrival order, before the next line of the response is decoded. The
    /// concatenation of all fragments is returned once the server sends
    /// `[DONE]` or closes the stream.
    ///
    /// On failure, fragments already handed to `on_fragment` are not
    /// retracted.
    pub async fn send<F>(&self, history: &[Message], on_fragment: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let target = self.default_target();
        self.run(history, target, None, on_fragment).await
    }

    /// Like [`send`](Self::send) but with an explicit model, key and endpoint.
    pub async fn send_with<F>(
        &self,
        history: &[Message],
        target: RequestTarget<'_>,
        on_fragment: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        validate_endpoint(target.endpoint)?;
        self.run(history, target, None, on_fragment).await
    }

    /// Like [`send`](Self::send), stopping with [`ChatError::Cancelled`] as
    /// soon as `cancel` fires. The connection is closed and no further
    /// fragments are delivered.
    pub async fn send_cancellable<F>(
        &self,
        history: &[Message],
        cancel: &CancelHandle,
        on_fragment: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let target = self.default_target();
        self.run(history, target, Some(cancel), on_fragment).await
    }

    /// Send `history` and return the reply as a cancellable stream of
    /// fragments, for callers that consume fragments on their own context.
    ///
    /// HTTP status errors are reported here, before any fragment. The client
    /// stays busy until the returned stream is dropped or exhausted.
    pub async fn stream(&self, history: &[Message]) -> Result<FragmentStreamHandle> {
        let guard = InFlightGuard::acquire(&self.in_flight)?;
        let target = self.default_target();
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(target: TARGET, "chat_stream", %request_id, model = %target.model);

        let body = self.open(history, target).instrument(span).await?;

        let fragments: FragmentStream = {
            let mut inner = decode_body(body);
            Box::pin(async_stream::stream! {
                use futures::StreamExt;
                let _guard = guard;
                while let Some(item) = inner.next().await {
                    yield item;
                }
            })
        };

        let cancel = CancelHandle::new();
        Ok(FragmentStreamHandle {
            stream: cancellable(fragments, &cancel),
            cancel,
        })
    }

    fn default_target(&self) -> RequestTarget<'_> {
        RequestTarget {
            model: &self.config.model,
            api_key: self.config.api_key.expose_secret(),
            endpoint: &self.config.endpoint,
        }
    }

    async fn run<F>(
        &self,
        history: &[Message],
        target: RequestTarget<'_>,
        cancel: Option<&CancelHandle>,
        mut on_fragment: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(target: TARGET, "chat_request", %request_id, model = %target.model);

        async move {
            let body = until_cancelled(cancel, self.open(history, target)).await?;
            let mut fragments = decode_body(body);

            let mut text = String::new();
            let mut count = 0usize;
            while let Some(fragment) = until_cancelled(cancel, next_fragment(&mut fragments)).await? {
                on_fragment(&fragment);
                text.push_str(&fragment);
                count += 1;
            }

            tracing::debug!(target: TARGET, fragments = count, bytes = text.len(), "chat request completed");
            Ok(text)
        }
        .instrument(span)
        .await
    }

    /// Post the request and return the body of a successful response.
    async fn open(&self, history: &[Message], target: RequestTarget<'_>) -> Result<ByteStream> {
        let request = build_request(history, target)?;
        tracing::debug!(
            target: TARGET,
            endpoint = %target.endpoint,
            messages = history.len(),
            api_key = %mask_secret(target.api_key),
            "sending chat request"
        );

        let response = self.transport.post_stream(request).await.inspect_err(|e| {
            tracing::debug!(target: TARGET, err = %e, "chat request failed");
        })?;

        tracing::debug!(target: TARGET, status = response.status, "response received");
        if !response.is_success() {
            return Err(ChatError::HttpStatus {
                code: response.status,
            });
        }
        Ok(response.body)
    }
}

impl std::fmt::Debug for StreamingChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingChatClient")
            .field("config", &self.config)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Build the JSON POST for `history`.
pub fn build_request(history: &[Message], target: RequestTarget<'_>) -> Result<TransportRequest> {
    let body = serde_json::to_value(OutboundRequest::new(target.model, history))?;

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", target.api_key))
        .map_err(|_| ChatError::Configuration("API key contains invalid characters".to_string()))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

    Ok(TransportRequest {
        url: target.endpoint.to_string(),
        headers,
        body,
    })
}

async fn next_fragment(fragments: &mut FragmentStream) -> Result<Option<String>> {
    use futures::StreamExt;
    fragments.next().await.transpose()
}

/// Await `fut`, bailing out with [`ChatError::Cancelled`] if `cancel` fires
/// first.
async fn until_cancelled<T>(
    cancel: Option<&CancelHandle>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match cancel {
        Some(cancel) => tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ChatError::Cancelled),
            out = fut => out,
        },
        None => fut.await,
    }
}

/// Marks a client busy for as long as it lives.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ChatError::Busy)?;
        Ok(Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
