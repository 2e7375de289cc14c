//! # chatstream - streaming chat for OpenAI-compatible endpoints
//!
//! A small client that sends a bounded conversation to a chat-completions
//! endpoint with `stream: true` and hands each text fragment of the reply to
//! the caller as soon as it arrives.
//!
#![deny(unsafe_code)]

//! ## Pieces
//!
//! - [`ConversationHistory`]: last N turns (12 by default), oldest evicted first
//! - [`StreamingChatClient`]: POST + SSE decoding, callback or stream form
//! - [`ChatSession`]: history and client glued together, one call per user turn
//! - [`Credentials`]: persisted API key and base URL over a [`PreferenceStore`]
//! - [`telemetry`]: optional `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatstream::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .api_key("your-api-key")
//!         .model("gpt-3.5-turbo")
//!         .build()?;
//!
//!     let mut session = ChatSession::new(StreamingChatClient::new(config)?);
//!     let reply = session
//!         .submit("Hello, world!", |fragment| print!("{fragment}"))
//!         .await?;
//!     println!();
//!     assert_eq!(session.history().len(), 2);
//!     # let _ = reply;
//!     Ok(())
//! }
//! ```
//!
//! ## Consuming fragments as a stream
//!
//! ```rust,no_run
//! use chatstream::prelude::*;
//! use futures::StreamExt;
//!
//! # async fn example(client: StreamingChatClient) -> Result<(), ChatError> {
//! let mut history = ConversationHistory::new();
//! history.append(user!("Write a haiku"));
//!
//! let mut handle = client.stream(&history.snapshot()).await?;
//! while let Some(fragment) = handle.stream.next().await {
//!     print!("{}", fragment?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod history;
pub mod macros;
pub mod request;
pub mod session;
pub mod storage;
pub mod streaming;
pub mod telemetry;
pub mod transport;
pub mod types;
pub mod utils;

pub use client::{RequestTarget, StreamingChatClient};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ChatError, ErrorCategory, Result};
pub use history::{ConversationHistory, Snapshot};
pub use session::ChatSession;
pub use storage::{Credentials, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use streaming::{FragmentStream, FragmentStreamHandle};
pub use transport::{ChatTransport, ReqwestTransport};
pub use types::{Message, Role};
pub use utils::CancelHandle;

/// Convenient imports
pub mod prelude {
    pub use crate::client::{RequestTarget, StreamingChatClient};
    pub use crate::config::ClientConfig;
    pub use crate::error::{ChatError, ErrorCategory};
    pub use crate::history::ConversationHistory;
    pub use crate::session::ChatSession;
    pub use crate::storage::{Credentials, FilePreferenceStore, PreferenceStore};
    pub use crate::streaming::FragmentStreamHandle;
    pub use crate::types::{Message, Role};
    pub use crate::utils::CancelHandle;
    pub use crate::{assistant, conversation, user};
}
