//! Public macros for building conversation messages
//!
//! Exported at crate root via `#[macro_export]`.

/// Creates a user message
#[macro_export]
macro_rules! user {
    ($content:expr) => {
        $crate::types::Message::user($content)
    };
}

/// Creates an assistant message
#[macro_export]
macro_rules! assistant {
    ($content:expr) => {
        $crate::types::Message::assistant($content)
    };
}

/// Creates a conversation with alternating user and assistant messages
///
/// ```rust
/// use chatstream::{conversation, types::Role};
///
/// let turns = conversation! {
///     "Hi" => "Hello! How can I help?",
///     "Tell me a joke" => "Why did the borrow checker...",
/// };
/// assert_eq!(turns.len(), 4);
/// assert_eq!(turns[1].role(), Role::Assistant);
/// ```
#[macro_export]
macro_rules! conversation {
    ($($user:expr => $assistant:expr),* $(,)?) => {
        {
            let mut msgs = Vec::new();
            $(
                msgs.push($crate::user!($user));
                msgs.push($crate::assistant!($assistant));
            )*
            msgs
        }
    };
}
