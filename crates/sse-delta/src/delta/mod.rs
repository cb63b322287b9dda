//! Delta patches: the `add` / `replace` / `append` vocabulary used by
//! delta-encoded completion streams.
//!
//! This is not RFC 6902. Paths auto-vivify missing containers, `replace` on a
//! key creates it, and `append` is a value-dependent merge (text
//! concatenation, array push, or shallow object merge).

pub mod apply;
pub mod codec;
pub mod resolve;
pub mod types;

pub use apply::{apply_op, apply_ops, apply_raw};
pub use codec::{decode_op, Envelope};
pub use resolve::resolve_parent;
pub use types::{type_name, ApplyLimits, DeltaError, DeltaOp, OpKind};
