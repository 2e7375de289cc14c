//! Cancellation utilities
//!
//! Provides first-class cancellation handles for fragment streams and
//! in-flight sends.

use tokio_util::sync::CancellationToken;

use crate::streaming::FragmentStream;

/// A handle that can be used to request cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new, untriggered cancel handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Any wrapped streams/futures observing this handle
    /// will stop as soon as possible. Dropping the cancelled stream closes
    /// the underlying HTTP connection so the server stops generating tokens.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

// Stream-based cancellation is implemented via async_stream to avoid pin projection.

/// Stop `stream` as soon as `handle` is cancelled, even while it is waiting
/// on the network.
pub fn cancellable(stream: FragmentStream, handle: &CancelHandle) -> FragmentStream {
    let token = handle.token.clone();
    let mut inner = stream;
    let s = async_stream::stream! {
        use futures::StreamExt;
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                item = inner.next() => {
                    let Some(item) = item else { break };
                    yield item;
                }
            }
        }
    };
    Box::pin(s)
}
