//! Error Handling Module
//!
//! Every fatal failure of a chat request surfaces as a single [`ChatError`].
//! Undecodable stream events are not errors: the decoder logs and skips them.
//!
//! # Example
//!
//! ```rust
//! use chatstream::error::{ChatError, ErrorCategory};
//!
//! let error = ChatError::HttpStatus { code: 401 };
//! assert_eq!(error.category(), ErrorCategory::Authentication);
//! assert_eq!(error.status_code(), Some(401));
//! ```

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Coarse classification of a [`ChatError`], useful for picking a
/// user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Client,
    Server,
    Network,
    Cancelled,
    Usage,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The endpoint answered with a non-success status. The body is never read.
    #[error("HTTP error {code}")]
    HttpStatus { code: u16 },

    /// Connecting, sending, or reading the response body failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Another send is still in flight on the same client.
    #[error("a chat request is already in flight on this client")]
    Busy,

    /// The caller abandoned the request before it completed.
    #[error("chat request cancelled")]
    Cancelled,

    /// The user turn was empty or whitespace only.
    #[error("refusing to send an empty message")]
    EmptyInput,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl ChatError {
    /// HTTP status carried by the error, if any.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code } => Some(*code),
            _ => None,
        }
    }

    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpStatus { code: 401 | 403 } => ErrorCategory::Authentication,
            Self::HttpStatus { code: 429 } => ErrorCategory::RateLimit,
            Self::HttpStatus { code } if *code >= 500 => ErrorCategory::Server,
            Self::HttpStatus { .. } => ErrorCategory::Client,
            Self::Transport(_) => ErrorCategory::Network,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Busy
            | Self::EmptyInput
            | Self::Configuration(_)
            | Self::Serialization(_)
            | Self::Telemetry(_) => ErrorCategory::Usage,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
