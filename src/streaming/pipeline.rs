//! Body-to-fragment pipeline
//!
//! Drives the raw response body through [`LineAssembler`] and
//! [`decode_line`], yielding content fragments in arrival order.

use futures::StreamExt;

use super::decoder::{StreamEvent, decode_line};
use super::line::LineAssembler;
use super::FragmentStream;
use crate::transport::ByteStream;

const TARGET: &str = "chatstream::stream";

enum Step {
    Emit(String),
    Stop,
    Skip,
}

fn step(line: &str) -> Step {
    match decode_line(line) {
        Some(StreamEvent::ContentDelta(text)) => Step::Emit(text),
        Some(StreamEvent::Done) => {
            tracing::debug!(target: TARGET, "received [DONE]");
            Step::Stop
        }
        Some(StreamEvent::Malformed(raw)) => {
            tracing::warn!(target: TARGET, payload = %raw, "skipping malformed stream event");
            Step::Skip
        }
        None => Step::Skip,
    }
}

/// Decode a response body into a stream of content fragments.
///
/// The stream ends after `[DONE]` (nothing further is read from the body) or
/// when the body is exhausted. A body error is yielded once and ends the
/// stream; fragments yielded before it stand.
///
/// Each line is decoded lazily, when the consumer asks for the next item, so
/// a fragment is always fully handled by the consumer before the following
/// line is looked at.
pub fn decode_body(body: ByteStream) -> FragmentStream {
    let fragments = async_stream::stream! {
        let mut body = body;
        let mut assembler = LineAssembler::new();
        let mut emitted = 0usize;

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    tracing::debug!(
                        target: TARGET,
                        err = %e,
                        emitted,
                        discarded = assembler.pending(),
                        "body read failed"
                    );
                    yield Err(e);
                    return;
                }
            };

            for line in assembler.push(&chunk) {
                match step(&line) {
                    Step::Emit(text) => {
                        emitted += 1;
                        yield Ok(text);
                    }
                    Step::Stop => return,
                    Step::Skip => {}
                }
            }
        }

        if let Some(line) = assembler.finish() {
            if let Step::Emit(text) = step(&line) {
                emitted += 1;
                yield Ok(text);
            }
        }

        tracing::debug!(target: TARGET, emitted, "body exhausted");
    };

    Box::pin(fragments)
}
