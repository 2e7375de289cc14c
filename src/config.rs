//! Client Configuration
//!
//! [`ClientConfig`] carries everything a request needs besides the history:
//! credentials, endpoint, model and HTTP timeouts. It can be assembled with
//! [`ClientConfigBuilder`], read from the environment, or loaded from a
//! [`Credentials`] store.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::defaults;
use crate::error::{ChatError, Result};
use crate::storage::{Credentials, PreferenceStore};

#[derive(Clone)]
pub struct ClientConfig {
    /// API key sent as a bearer token
    pub api_key: SecretString,
    /// Full chat-completions URL
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Overall timeout for one streamed exchange; `None` disables it
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration for `api_key` with default endpoint, model and timeouts.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            endpoint: defaults::chat::ENDPOINT.to_string(),
            model: defaults::chat::MODEL.to_string(),
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: defaults::http::CONNECT_TIMEOUT,
            user_agent: defaults::http::USER_AGENT.to_string(),
        }
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read `CHATSTREAM_API_KEY` (required), `CHATSTREAM_ENDPOINT` and
    /// `CHATSTREAM_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(defaults::env::API_KEY).map_err(|_| {
            ChatError::Configuration(format!("{} is not set", defaults::env::API_KEY))
        })?;

        let mut builder = Self::builder().api_key(api_key);
        if let Ok(endpoint) = std::env::var(defaults::env::ENDPOINT) {
            builder = builder.base_url(endpoint);
        }
        if let Ok(model) = std::env::var(defaults::env::MODEL) {
            builder = builder.model(model);
        }
        builder.build()
    }

    /// Load the persisted API key and base URL.
    ///
    /// A missing key is an error; a missing base URL falls back to the
    /// default endpoint.
    pub fn from_credentials<S: PreferenceStore>(credentials: &Credentials<S>) -> Result<Self> {
        let api_key = credentials
            .api_key()?
            .ok_or_else(|| ChatError::Configuration("no API key stored".to_string()))?;

        let mut builder = Self::builder().api_key(api_key.expose_secret());
        if let Some(base_url) = credentials.base_url()? {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ChatError::Configuration("API key is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ChatError::Configuration("model is empty".to_string()));
        }
        validate_endpoint(&self.endpoint)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Check that `endpoint` is an absolute http(s) URL.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| ChatError::Configuration(format!("invalid endpoint {endpoint:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ChatError::Configuration(format!(
            "unsupported endpoint scheme {other:?}"
        ))),
    }
}

/// Turn a user-supplied base URL into a chat-completions endpoint.
///
/// A URL without a path gets `/v1/chat/completions`; one ending in `/v1`
/// gets `/chat/completions`; anything else is taken as the full endpoint.
pub fn resolve_endpoint(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    let path = trimmed.splitn(4, '/').nth(3).unwrap_or("");
    if path.is_empty() {
        format!("{trimmed}{}", defaults::chat::COMPLETIONS_PATH)
    } else if path == "v1" || path.ends_with("/v1") {
        format!("{trimmed}/chat/completions")
    } else {
        trimmed.to_string()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<SecretString>,
    endpoint: Option<String>,
    model: Option<String>,
    timeout: Option<Option<Duration>>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the API key
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Set the full chat-completions URL, used verbatim.
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a base URL; see [`resolve_endpoint`].
    pub fn base_url<S: AsRef<str>>(mut self, base_url: S) -> Self {
        self.endpoint = Some(resolve_endpoint(base_url.as_ref()));
        self
    }

    /// Set the model
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(Some(timeout));
        self
    }

    /// Let streams run for as long as the server keeps them open.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = Some(None);
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| ChatError::Configuration("API key is required".to_string()))?;

        let mut config = ClientConfig::new(api_key.expose_secret());
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(connect_timeout) = self.connect_timeout {
            config.connect_timeout = connect_timeout;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        config.validate()?;
        Ok(config)
    }
}
