//! Chat-completion event decoding
//!
//! Turns one complete SSE line into at most one [`StreamEvent`]. Only the
//! minimal subset used by OpenAI-compatible endpoints is understood: lines of
//! the form `data: <json>` or `data: [DONE]`. Everything else (comments,
//! keep-alives, blank separators, `event:` fields) is ignored.

use serde::Deserialize;

/// Prefix marking a data line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A decoded unit of the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental assistant text.
    ContentDelta(String),
    /// The server signalled the end of the stream.
    Done,
    /// A data line that could not be decoded; carries the raw payload.
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Decode a single complete line.
///
/// Returns `None` for lines that carry nothing: non-data lines, chunks with
/// an empty `choices` array, and deltas without `content` (a JSON `null`
/// counts as absent). Only the first choice is read.
pub fn decode_line(line: &str) -> Option<StreamEvent> {
    let payload = line.strip_prefix(DATA_PREFIX)?;

    if payload.trim() == DONE_SENTINEL {
        return Some(StreamEvent::Done);
    }

    match serde_json::from_str::<CompletionChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .map(StreamEvent::ContentDelta),
        Err(_) => Some(StreamEvent::Malformed(payload.to_string())),
    }
}
