//! Incremental line assembly
//!
//! Network chunk boundaries do not line up with line boundaries, nor with
//! UTF-8 character boundaries. [`LineAssembler`] buffers raw bytes and only
//! hands out a line once its `\n` terminator has arrived, so a decoder never
//! sees a prefix of a line.

/// Buffers raw body chunks and emits complete lines.
///
/// Splitting happens on the `\n` byte, which never occurs inside a multi-byte
/// UTF-8 sequence, so every emitted line holds whole characters. A trailing
/// `\r` is stripped. Invalid UTF-8 is replaced rather than rejected.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
    /// Bytes at the front of `buf` already known to contain no `\n`.
    scanned: usize,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = self.buf[search_from..].iter().position(|b| *b == b'\n') {
            let end = search_from + offset;
            lines.push(decode(&self.buf[start..end]));
            start = end + 1;
            search_from = start;
        }

        self.buf.drain(..start);
        self.scanned = self.buf.len();
        lines
    }

    /// Take whatever is left once the body has ended.
    ///
    /// The connection closing terminates the last line, so an unterminated
    /// remainder is returned as a complete line. Returns `None` when nothing
    /// is buffered.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let line = decode(&self.buf);
        self.buf.clear();
        self.scanned = 0;
        Some(line)
    }

    /// Number of buffered bytes not yet emitted as a line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
