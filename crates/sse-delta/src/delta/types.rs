//! Core types for delta operations.

use serde_json::Value;
use thiserror::Error;

pub use sse_delta_pointer::{Path, PathSegment};

// ── Error ─────────────────────────────────────────────────────────────────

/// Why a single delta operation (or a whole envelope) had no effect.
///
/// None of these abort a conversion by default; the merge loop records them
/// and moves on to the next operation.
#[derive(Debug, Error)]
pub enum DeltaError {
    #[error("structure mismatch at '{pointer}': expected {expected}, found {found}")]
    StructureMismatch {
        pointer: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("index {index} out of range at '{pointer}' (len {len})")]
    IndexOutOfRange {
        pointer: String,
        index: usize,
        len: usize,
    },
    #[error("index {index} exceeds the limit of {max}")]
    IndexTooLarge { index: usize, max: usize },
    #[error("operation has no path")]
    MissingPath,
    #[error("operation has no op")]
    MissingOp,
    #[error("unknown op: {0}")]
    UnknownOp(String),
    #[error("invalid operation: {0}")]
    InvalidOp(String),
    #[error("{0} is not supported at the root for this value")]
    UnsupportedRoot(OpKind),
    #[error("no append rule matches the target at '{pointer}'")]
    UnsupportedAppend { pointer: String },
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Op kind ───────────────────────────────────────────────────────────────

/// The operation vocabulary of a delta stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Replace,
    Append,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Add => "add",
            OpKind::Replace => "replace",
            OpKind::Append => "append",
        }
    }

    /// Resolve an `o` field. `patch` is not an op kind; it is handled at the
    /// envelope level.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(OpKind::Add),
            "replace" => Some(OpKind::Replace),
            "append" => Some(OpKind::Append),
            _ => None,
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Op ────────────────────────────────────────────────────────────────────

/// One decoded `{p, o, v}` operation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaOp {
    pub path: Path,
    pub kind: OpKind,
    pub value: Value,
}

impl DeltaOp {
    pub fn new(path: Path, kind: OpKind, value: Value) -> Self {
        Self { path, kind, value }
    }

    /// Build an op from a pointer string.
    pub fn at(pointer: &str, kind: OpKind, value: Value) -> Self {
        Self::new(sse_delta_pointer::parse_pointer(pointer), kind, value)
    }

    pub fn pointer(&self) -> String {
        sse_delta_pointer::format_pointer(&self.path)
    }
}

// ── Limits ────────────────────────────────────────────────────────────────

/// Bounds applied while growing the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyLimits {
    /// Largest index an intermediate path segment may address. Intermediate
    /// arrays are padded with `null` up to the index, so this bounds memory
    /// per op. The final segment is not checked: `add` past the end appends
    /// and `replace` past the end fails with `IndexOutOfRange`.
    pub max_array_index: usize,
}

impl Default for ApplyLimits {
    fn default() -> Self {
        Self {
            max_array_index: 1_000_000,
        }
    }
}

impl ApplyLimits {
    pub(crate) fn check_index(&self, index: usize) -> Result<usize, DeltaError> {
        if index > self.max_array_index {
            return Err(DeltaError::IndexTooLarge {
                index,
                max: self.max_array_index,
            });
        }
        Ok(index)
    }
}

/// Name of a value's JSON type, for diagnostics.
pub fn type_name(val: &Value) -> &'static str {
    match val {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
