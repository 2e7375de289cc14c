//! Outbound request body

use serde::Serialize;

use crate::types::Message;

/// JSON body of a streamed chat-completion request.
///
/// Borrows the conversation snapshot; `stream` is always `true`.
#[derive(Debug, Serialize)]
pub struct OutboundRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
}

impl<'a> OutboundRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [Message]) -> Self {
        Self {
            model,
            messages,
            stream: true,
        }
    }
}
