//! Shared test helpers: scripted transports and SSE fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chatstream::ChatError;
use chatstream::transport::{ByteStream, ChatTransport, TransportRequest, TransportResponse};
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What happens after the scripted chunks have been delivered.
#[derive(Debug, Clone)]
pub enum Tail {
    /// Body ends normally
    End,
    /// Body fails with this error
    Fail(ChatError),
    /// Body never yields again
    Hang,
}

/// One canned response.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub status: u16,
    pub chunks: Vec<Vec<u8>>,
    pub tail: Tail,
}

impl ScriptedResponse {
    /// 200 with the given body chunks, delivered one by one.
    pub fn sse<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self {
            status: 200,
            chunks: chunks.into_iter().map(Into::into).collect(),
            tail: Tail::End,
        }
    }

    /// Non-success status; the body would still decode to `"leaked"`.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            chunks: vec![delta_line("leaked").into_bytes()],
            tail: Tail::End,
        }
    }

    pub fn then_fail(mut self, error: ChatError) -> Self {
        self.tail = Tail::Fail(error);
        self
    }

    pub fn then_hang(mut self) -> Self {
        self.tail = Tail::Hang;
        self
    }

    fn into_body(self) -> ByteStream {
        let chunks = futures_util::stream::iter(
            self.chunks
                .into_iter()
                .map(|c| Ok::<_, ChatError>(Bytes::from(c))),
        );
        match self.tail {
            Tail::End => Box::pin(chunks),
            Tail::Fail(e) => Box::pin(chunks.chain(futures_util::stream::once(async move { Err(e) }))),
            Tail::Hang => Box::pin(chunks.chain(futures_util::stream::pending())),
        }
    }
}

/// Transport that replays scripted responses in order and records requests.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn post_stream(&self, request: TransportRequest) -> Result<TransportResponse, ChatError> {
        self.requests.lock().expect("lock").push(request);
        let next = self.responses.lock().expect("lock").pop_front();
        let response =
            next.ok_or_else(|| ChatError::Transport("no scripted response left".to_string()))?;
        Ok(TransportResponse {
            status: response.status,
            body: response.into_body(),
        })
    }
}

/// One terminated SSE line carrying a content delta.
pub fn delta_line(content: &str) -> String {
    let chunk = serde_json::json!({
        "object": "chat.completion.chunk",
        "choices": [{ "index": 0, "delta": { "content": content }, "finish_reason": null }]
    });
    format!("data: {chunk}\n\n")
}

pub const DONE_LINE: &str = "data: [DONE]\n\n";

/// Read an `.sse` fixture under `tests/fixtures`.
pub fn load_sse_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path}: {e}"))
}

/// Cut `body` into chunks of `size` bytes, ignoring UTF-8 boundaries.
pub fn split_every(body: &str, size: usize) -> Vec<Vec<u8>> {
    body.as_bytes().chunks(size).map(<[u8]>::to_vec).collect()
}

/// Client over `transport` with a fixed test key.
pub fn client_with(transport: &ScriptedTransport) -> chatstream::StreamingChatClient {
    let config = chatstream::ClientConfig::new("sk-test-0123456789");
    chatstream::StreamingChatClient::with_transport(config, Arc::new(transport.clone()))
        .expect("valid config")
}
