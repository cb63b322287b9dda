//! Builders for SSE fixture streams.

#![allow(dead_code)]

use serde_json::Value;

/// Accumulates SSE events into a text blob.
#[derive(Default)]
pub struct StreamBuilder {
    text: String,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(self, version: &str) -> Self {
        self.event("delta_encoding", &format!("\"{version}\""))
    }

    /// A `delta` event with a single-line JSON body.
    pub fn delta(self, body: Value) -> Self {
        self.event("delta", &body.to_string())
    }

    /// A `delta` event with a raw (possibly malformed) payload.
    pub fn delta_raw(self, payload: &str) -> Self {
        self.event("delta", payload)
    }

    pub fn event(mut self, name: &str, data: &str) -> Self {
        self.text.push_str(&format!("event: {name}\ndata: {data}\n\n"));
        self
    }

    /// An event whose payload is split across several `data:` lines.
    pub fn multi_line(mut self, name: &str, chunks: &[&str]) -> Self {
        self.text.push_str(&format!("event: {name}\n"));
        for chunk in chunks {
            self.text.push_str(&format!("data: {chunk}\n"));
        }
        self.text.push('\n');
        self
    }

    pub fn done(mut self) -> Self {
        self.text.push_str("data: [DONE]\n\n");
        self
    }

    pub fn raw(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    pub fn build(self) -> String {
        self.text
    }
}
