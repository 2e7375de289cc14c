//! Streaming Module
//!
//! Everything between the raw response body and the caller's fragments:
//! - [`LineAssembler`]: incremental, UTF-8 safe line buffering
//! - [`decode_line`]: one SSE line to one [`StreamEvent`]
//! - [`decode_body`]: the two combined into a [`FragmentStream`]

mod decoder;
mod line;
mod pipeline;

pub use decoder::{DATA_PREFIX, DONE_SENTINEL, StreamEvent, decode_line};
pub use line::LineAssembler;
pub use pipeline::decode_body;

use futures::Stream;
use std::pin::Pin;

use crate::error::ChatError;
use crate::utils::cancel::CancelHandle;

/// Pinned, boxed stream of content fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

/// Fragment stream with a first-class cancellation handle.
///
/// Cancelling stops the stream at its next poll and drops the response body,
/// which closes the connection.
pub struct FragmentStreamHandle {
    /// The underlying fragment stream
    pub stream: FragmentStream,
    /// Handle to cancel the stream
    pub cancel: CancelHandle,
}

impl FragmentStreamHandle {
    /// Request cancellation of the stream.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for FragmentStreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentStreamHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
