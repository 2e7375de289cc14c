//! Chat session
//!
//! [`ChatSession`] pairs a [`ConversationHistory`] with a
//! [`StreamingChatClient`]: each submitted line becomes a user turn, the
//! bounded history is snapshotted and sent, and the streamed reply is stored
//! as the assistant turn.

use crate::client::StreamingChatClient;
use crate::error::{ChatError, Result};
use crate::history::{ConversationHistory, Snapshot};
use crate::types::Message;
use crate::utils::cancel::CancelHandle;

#[derive(Debug)]
pub struct ChatSession {
    client: StreamingChatClient,
    history: ConversationHistory,
}

impl ChatSession {
    /// Start a session with an empty history of default capacity.
    pub fn new(client: StreamingChatClient) -> Self {
        Self::with_history(client, ConversationHistory::new())
    }

    pub fn with_history(client: StreamingChatClient, history: ConversationHistory) -> Self {
        Self { client, history }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn client(&self) -> &StreamingChatClient {
        &self.client
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn set_model(&mut self, model: impl Into<String>) -> Result<()> {
        self.client.set_model(model)
    }

    /// Drop every turn of the conversation.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Send `user_text` and stream the reply into `on_fragment`.
    ///
    /// Blank input is rejected with [`ChatError::EmptyInput`] before anything
    /// is recorded. If the request fails, the user turn stays in the history
    /// and no assistant turn is added.
    pub async fn submit<F>(&mut self, user_text: &str, on_fragment: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let snapshot = self.push_user(user_text)?;
        let reply = self.client.send(&snapshot, on_fragment).await?;
        self.history.append(Message::assistant(reply.clone()));
        Ok(reply)
    }

    /// [`submit`](Self::submit) that stops with [`ChatError::Cancelled`] when
    /// `cancel` fires. A cancelled reply is not recorded.
    pub async fn submit_cancellable<F>(
        &mut self,
        user_text: &str,
        cancel: &CancelHandle,
        on_fragment: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let snapshot = self.push_user(user_text)?;
        let reply = self
            .client
            .send_cancellable(&snapshot, cancel, on_fragment)
            .await?;
        self.history.append(Message::assistant(reply.clone()));
        Ok(reply)
    }

    fn push_user(&mut self, user_text: &str) -> Result<Snapshot> {
        if user_text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        self.history.append(Message::user(user_text));
        Ok(self.history.snapshot())
    }
}
