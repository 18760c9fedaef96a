//! Incremental Server-Sent Events parsing.
//!
//! Bytes are appended as they arrive and complete lines are consumed lazily, so
//! a caller can stop at the first useful event without reading further. Lines
//! are split on `\n` before UTF-8 decoding; a multi-byte character cut in half
//! by a chunk boundary stays in the carry buffer until its tail arrives.

use crate::types::Seed;
use serde_json::Value;
use tracing::debug;

const DATA_FIELD: &str = "data:";

/// Line-reassembly state for one event stream.
#[derive(Debug, Default)]
pub struct SseParser {
    /// Bytes after the last consumed newline
    buffer: Vec<u8>,
    /// `data:` payloads of the event being assembled
    data_lines: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of the response body.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Next dispatched event payload, if a complete one is buffered.
    ///
    /// A blank line dispatches the pending `data:` lines joined with `\n`.
    /// Other fields (`event:`, `id:`, `retry:`, comments) are ignored.
    pub fn next_event(&mut self) -> Option<String> {
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let text = String::from_utf8_lossy(&raw);
            let line = text.trim();

            if line.is_empty() {
                if self.data_lines.is_empty() {
                    continue;
                }
                let payload = self.data_lines.join("\n");
                self.data_lines.clear();
                return Some(payload);
            }

            if let Some(data) = line.strip_prefix(DATA_FIELD) {
                self.data_lines.push(data.trim_start().to_string());
            }
        }
        None
    }

    /// Bytes held back waiting for a newline.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Number of `data:` lines waiting for a blank line.
    pub fn pending_data_lines(&self) -> usize {
        self.data_lines.len()
    }
}

/// Pull the seed out of an event payload at `pointer`.
///
/// Payloads that are not JSON, lack the field, or hold an empty or non-string
/// value produce `None`.
pub fn extract_seed(payload: &str, pointer: &str) -> Option<Seed> {
    let document: Value = match serde_json::from_str(payload) {
        Ok(document) => document,
        Err(e) => {
            debug!("Discarding non-JSON event block: {}", e);
            return None;
        }
    };

    document
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|seed| !seed.is_empty())
        .map(str::to_string)
}
