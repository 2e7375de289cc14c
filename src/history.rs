//! Bounded conversation history
//!
//! [`ConversationHistory`] keeps the most recent turns of a conversation and
//! silently drops the oldest ones once its capacity is reached. Requests are
//! built from a [`Snapshot`], an immutable copy that later appends never touch.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::defaults;
use crate::types::Message;

/// Immutable point-in-time view of a history.
pub type Snapshot = Arc<[Message]>;

/// Ordered, capacity-bounded sequence of messages with FIFO eviction.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl ConversationHistory {
    /// Create an empty history holding at most
    /// [`HISTORY_CAPACITY`](defaults::chat::HISTORY_CAPACITY) messages.
    pub fn new() -> Self {
        Self::with_capacity(defaults::chat::HISTORY_CAPACITY)
    }

    /// Create an empty history with a fixed capacity.
    ///
    /// A capacity of zero is clamped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting from the front until the length fits.
    pub fn append(&mut self, message: Message) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    /// Copy the current contents into an immutable snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.messages.iter().cloned().collect()
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Message> {
        self.messages.iter()
    }

    /// Forget every message. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Message> for ConversationHistory {
    fn extend<I: IntoIterator<Item = Message>>(&mut self, iter: I) {
        for message in iter {
            self.append(message);
        }
    }
}
