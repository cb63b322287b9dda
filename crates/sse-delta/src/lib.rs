//! sse-delta — rebuild a JSON document from a delta-encoded SSE stream.
//!
//! Streaming chat/completion APIs can send their response as a sequence of
//! `delta` events, each carrying `add` / `replace` / `append` patches against
//! a growing JSON document. This crate frames the SSE text, decodes the patch
//! envelopes, and applies them to produce the final document.
//!
//! ```
//! let stream = "\
//! event: delta
//! data: {\"p\": \"/text\", \"o\": \"add\", \"v\": \"Hel\"}
//!
//! event: delta
//! data: {\"p\": \"/text\", \"o\": \"append\", \"v\": \"lo\"}
//!
//! data: [DONE]
//! ";
//! let doc = sse_delta::sse_to_json(stream);
//! assert_eq!(doc, serde_json::json!({"text": "Hello"}));
//! ```

pub mod convert;
pub mod delta;
pub mod sse;

pub use convert::{
    convert, sse_to_json, ConvertError, ConvertOptions, ConvertReport, Conversion, DeltaMerger,
    Diagnostic, Flow,
};
pub use delta::{ApplyLimits, DeltaError, DeltaOp, Envelope, OpKind};
pub use sse::{frame_events, SseEvent, SseFramer};
pub use sse_delta_pointer::{parse_pointer, Path, PathSegment};
