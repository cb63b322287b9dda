//! Delta operation apply logic.

use serde_json::{Map, Value};
use sse_delta_pointer::format_pointer;

use super::codec::decode_op;
use super::resolve::resolve_parent;
use super::types::{type_name, ApplyLimits, DeltaError, DeltaOp, OpKind, PathSegment};

// ── Root operations ───────────────────────────────────────────────────────

fn apply_root(doc: &mut Value, kind: OpKind, value: Value) -> Result<(), DeltaError> {
    match (kind, doc) {
        (OpKind::Add, Value::Object(root)) => match value {
            Value::Object(props) => {
                merge_into(root, props);
                Ok(())
            }
            _ => Err(DeltaError::UnsupportedRoot(kind)),
        },
        (OpKind::Replace, Value::Object(root)) => {
            root.clear();
            if let Value::Object(props) = value {
                merge_into(root, props);
            }
            Ok(())
        }
        (kind, _) => Err(DeltaError::UnsupportedRoot(kind)),
    }
}

fn merge_into(target: &mut Map<String, Value>, props: Map<String, Value>) {
    for (k, v) in props {
        target.insert(k, v);
    }
}

fn parent_mismatch(path: &[PathSegment], expected: &'static str, found: &Value) -> DeltaError {
    DeltaError::StructureMismatch {
        pointer: format_pointer(&path[..path.len() - 1]),
        expected,
        found: type_name(found),
    }
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(
    parent: &mut Value,
    path: &[PathSegment],
    last: &PathSegment,
    value: Value,
) -> Result<(), DeltaError> {
    match (parent, last) {
        (Value::Array(arr), PathSegment::Index { index, .. }) => {
            // Inserting past the end appends.
            let at = (*index).min(arr.len());
            arr.insert(at, value);
            Ok(())
        }
        (Value::Object(map), PathSegment::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (other, PathSegment::Index { .. }) => Err(parent_mismatch(path, "array", other)),
        (other, PathSegment::Key(_)) => Err(parent_mismatch(path, "object", other)),
    }
}

/// Index targets must exist. Key targets are created when missing, the same
/// as `add`; streams rely on this and it is not strict JSON Patch `replace`.
fn apply_replace(
    parent: &mut Value,
    path: &[PathSegment],
    last: &PathSegment,
    value: Value,
) -> Result<(), DeltaError> {
    match (parent, last) {
        (Value::Array(arr), PathSegment::Index { index, .. }) => {
            let len = arr.len();
            match arr.get_mut(*index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(DeltaError::IndexOutOfRange {
                    pointer: format_pointer(path),
                    index: *index,
                    len,
                }),
            }
        }
        (Value::Object(map), PathSegment::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (other, PathSegment::Index { .. }) => Err(parent_mismatch(path, "array", other)),
        (other, PathSegment::Key(_)) => Err(parent_mismatch(path, "object", other)),
    }
}

/// Value-dependent append:
///
/// - string onto string concatenates;
/// - anything onto an array pushes;
/// - an object onto an object parent shallow-merges into the target key,
///   which is reset to `{}` first unless it already holds an object.
fn apply_append(
    parent: &mut Value,
    path: &[PathSegment],
    last: &PathSegment,
    value: Value,
) -> Result<(), DeltaError> {
    let target = match (&mut *parent, last) {
        (Value::Array(arr), PathSegment::Index { index, .. }) => arr.get_mut(*index),
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        _ => None,
    };

    let value = match (target, value) {
        (Some(Value::String(current)), Value::String(tail)) => {
            current.push_str(&tail);
            return Ok(());
        }
        (Some(Value::Array(items)), value) => {
            items.push(value);
            return Ok(());
        }
        (_, value) => value,
    };

    match (parent, value) {
        (Value::Object(map), Value::Object(props)) => {
            let slot = map.entry(last.as_key().to_string()).or_insert(Value::Null);
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(target) = slot {
                merge_into(target, props);
            }
            Ok(())
        }
        _ => Err(DeltaError::UnsupportedAppend {
            pointer: format_pointer(path),
        }),
    }
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single decoded operation to the document (in-place mutation).
///
/// On error the document is left as it was before the call, except for
/// intermediate containers already created along the path.
///
/// `limits` bounds only the intermediate indices that pad arrays; the final
/// segment never grows an array by more than one element.
pub fn apply_op(doc: &mut Value, op: DeltaOp, limits: &ApplyLimits) -> Result<(), DeltaError> {
    let DeltaOp { path, kind, value } = op;
    let Some(last) = path.last() else {
        return apply_root(doc, kind, value);
    };
    let parent = resolve_parent(doc, &path, limits)?;
    match kind {
        OpKind::Add => apply_add(parent, &path, last, value),
        OpKind::Replace => apply_replace(parent, &path, last, value),
        OpKind::Append => apply_append(parent, &path, last, value),
    }
}

/// Decode a raw `{p, o, v}` object and apply it.
pub fn apply_raw(doc: &mut Value, raw: &Value, limits: &ApplyLimits) -> Result<(), DeltaError> {
    let op = decode_op(raw)?;
    apply_op(doc, op, limits)
}

/// Apply a sequence of operations in order, skipping the ones that fail.
///
/// Returns the failures together with the position of the failing op.
pub fn apply_ops(
    doc: &mut Value,
    ops: Vec<DeltaOp>,
    limits: &ApplyLimits,
) -> Vec<(usize, DeltaError)> {
    let mut failures = Vec::new();
    for (i, op) in ops.into_iter().enumerate() {
        if let Err(e) = apply_op(doc, op, limits) {
            failures.push((i, e));
        }
    }
    failures
}

// ── Tests ─────────────────────────────────────────────────────────────────
