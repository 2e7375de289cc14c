//! Default Configuration Values
//!
//! Centralizes the default values used throughout the crate.

use std::time::Duration;

/// HTTP client defaults
pub mod http {
    use super::*;

    /// Upper bound for a whole streamed exchange, body included.
    ///
    /// Streams stay open for as long as the model keeps generating, so this
    /// is deliberately longer than a typical request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("chatstream/", env!("CARGO_PKG_VERSION"));
}

/// Chat defaults
pub mod chat {
    /// Full chat-completions URL used when none is configured.
    pub const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

    /// Path appended to a bare base URL (one without a path).
    pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

    pub const MODEL: &str = "gpt-3.5-turbo";

    /// Models offered for selection.
    pub const KNOWN_MODELS: &[&str] = &[
        "gpt-4-turbo-preview",
        "gpt-4",
        "gpt-4-32k",
        "gpt-3.5-turbo",
        "gpt-3.5-turbo-16k",
    ];

    /// Number of turns kept in a conversation history.
    pub const HISTORY_CAPACITY: usize = 12;
}

/// Environment variable names
pub mod env {
    pub const API_KEY: &str = "CHATSTREAM_API_KEY";
    pub const ENDPOINT: &str = "CHATSTREAM_ENDPOINT";
    pub const MODEL: &str = "CHATSTREAM_MODEL";
    pub const LOG_LEVEL: &str = "CHATSTREAM_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "CHATSTREAM_LOG_FORMAT";
    pub const LOG_FILE: &str = "CHATSTREAM_LOG_FILE";
}
