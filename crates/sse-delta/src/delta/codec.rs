//! JSON codec for delta operations and envelopes.
//!
//! A `delta` event body comes in one of two shapes:
//!
//! ```text
//! batch:   {"v": [{"p": ..., "o": ..., "v": ...}, ...]}
//! single:  {"p": ..., "o": ..., "v": ...}
//! ```
//!
//! A single op with `"o": "patch"` at the root pointer `""` carries a batch
//! in its `v`.

use serde_json::Value;
use sse_delta_pointer::parse_pointer;

use super::types::{DeltaError, DeltaOp, OpKind};

const PATCH_OP: &str = "patch";

/// Decode one `{p, o, v}` object.
///
/// A `p` that is missing, `null`, or not a string is [`DeltaError::MissingPath`];
/// the same for `o` gives [`DeltaError::MissingOp`]. A missing `v` decodes as
/// `null`.
pub fn decode_op(raw: &Value) -> Result<DeltaOp, DeltaError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| DeltaError::InvalidOp(format!("expected an object, got {raw}")))?;
    let pointer = obj
        .get("p")
        .and_then(Value::as_str)
        .ok_or(DeltaError::MissingPath)?;
    let kind = match obj.get("o") {
        None | Some(Value::Null) => return Err(DeltaError::MissingOp),
        Some(Value::String(name)) => {
            OpKind::from_name(name).ok_or_else(|| DeltaError::UnknownOp(name.clone()))?
        }
        Some(other) => return Err(DeltaError::UnknownOp(other.to_string())),
    };
    let value = obj.get("v").cloned().unwrap_or(Value::Null);
    Ok(DeltaOp::new(parse_pointer(pointer), kind, value))
}

/// The decoded body of a `delta` event: the raw operations it carries, in
/// stream order.
///
/// Operations stay undecoded so that one malformed element only costs that
/// element.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{"v": [...]}` or a root `patch` op.
    Batch(Vec<Value>),
    /// A single `{p, o, v}` op.
    Single(Value),
}

impl Envelope {
    /// Classify a parsed event body.
    pub fn from_json(body: Value) -> Result<Self, DeltaError> {
        let Value::Object(mut obj) = body else {
            return Err(DeltaError::InvalidEnvelope("body is not an object".into()));
        };

        if !obj.contains_key("p") && !obj.contains_key("o") {
            return match obj.remove("v") {
                Some(Value::Array(ops)) => Ok(Envelope::Batch(ops)),
                _ => Err(DeltaError::InvalidEnvelope("no op and no batch".into())),
            };
        }

        if !obj.contains_key("o") {
            return Err(DeltaError::InvalidEnvelope("path without op".into()));
        }

        let is_root_patch = obj.get("o").and_then(Value::as_str) == Some(PATCH_OP)
            && obj.get("p").and_then(Value::as_str) == Some("");
        if is_root_patch {
            return match obj.remove("v") {
                Some(Value::Array(ops)) => Ok(Envelope::Batch(ops)),
                _ => Err(DeltaError::InvalidEnvelope("patch value is not an array".into())),
            };
        }

        Ok(Envelope::Single(Value::Object(obj)))
    }

    /// Parse and classify an event payload.
    pub fn parse(payload: &str) -> Result<Self, DeltaError> {
        let body: Value = serde_json::from_str(payload)?;
        Self::from_json(body)
    }

    pub fn into_ops(self) -> Vec<Value> {
        match self {
            Envelope::Batch(ops) => ops,
            Envelope::Single(op) => vec![op],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Envelope::Batch(ops) => ops.len(),
            Envelope::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
