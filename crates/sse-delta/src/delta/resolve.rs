//! Get-or-create traversal to the parent container of a path.
//!
//! Every intermediate step is shaped by the segment that follows it: an index
//! segment next means the child must be an array, a key segment next means it
//! must be an object. Missing or wrongly-shaped children are replaced with a
//! fresh empty container of the required shape.

use serde_json::{Map, Value};
use sse_delta_pointer::format_pointer;

use super::types::{type_name, ApplyLimits, DeltaError, PathSegment};

fn empty_container(array: bool) -> Value {
    if array {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn has_shape(val: &Value, array: bool) -> bool {
    if array {
        val.is_array()
    } else {
        val.is_object()
    }
}

fn mismatch(path: &[PathSegment], expected: &'static str, found: &Value) -> DeltaError {
    DeltaError::StructureMismatch {
        pointer: format_pointer(path),
        expected,
        found: type_name(found),
    }
}

/// Walk `path` from `root`, creating intermediate containers as needed, and
/// return the container that holds the final segment.
///
/// For a single-segment path this is `root` itself. The empty path has no
/// parent; callers handle root operations separately, and an empty path here
/// also yields `root`.
///
/// Fails only when the container a segment is applied to has the wrong type,
/// e.g. an index segment against an object root.
pub fn resolve_parent<'a>(
    root: &'a mut Value,
    path: &[PathSegment],
    limits: &ApplyLimits,
) -> Result<&'a mut Value, DeltaError> {
    let mut current = root;
    for (i, step) in path.windows(2).enumerate() {
        let (segment, next) = (&step[0], &step[1]);
        let want_array = next.is_index();
        current = match segment {
            PathSegment::Index { index, .. } => {
                let arr = match current {
                    Value::Array(arr) => arr,
                    other => return Err(mismatch(&path[..=i], "array", other)),
                };
                let idx = limits.check_index(*index)?;
                if arr.len() <= idx {
                    arr.resize(idx + 1, Value::Null);
                }
                let slot = &mut arr[idx];
                if !has_shape(slot, want_array) {
                    *slot = empty_container(want_array);
                }
                slot
            }
            PathSegment::Key(key) => {
                let map = match current {
                    Value::Object(map) => map,
                    other => return Err(mismatch(&path[..=i], "object", other)),
                };
                let slot = map
                    .entry(key.clone())
                    .or_insert_with(|| empty_container(want_array));
                if !has_shape(slot, want_array) {
                    *slot = empty_container(want_array);
                }
                slot
            }
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sse_delta_pointer::parse_pointer;

    fn resolve<'a>(root: &'a mut Value, ptr: &str) -> Result<&'a mut Value, DeltaError> {
        resolve_parent(root, &parse_pointer(ptr), &ApplyLimits::default())
    }

    #[test]
    fn single_segment_parent_is_root() {
        let mut doc = json!({"a": 1});
        let parent = resolve(&mut doc, "/a").unwrap();
        assert_eq!(*parent, json!({"a": 1}));
    }

    #[test]
    fn creates_objects_and_arrays_by_lookahead() {
        let mut doc = json!({});
        let parent = resolve(&mut doc, "/choices/0/message/content").unwrap();
        assert_eq!(*parent, json!({}));
        assert_eq!(doc, json!({"choices": [{"message": {}}]}));
    }

    #[test]
    fn pads_arrays_with_null() {
        let mut doc = json!({});
        resolve(&mut doc, "/list/2/x").unwrap();
        assert_eq!(doc, json!({"list": [null, null, {}]}));
    }

    #[test]
    fn replaces_wrong_shape_intermediates() {
        let mut doc = json!({"a": [1, 2], "b": "text"});
        resolve(&mut doc, "/a/k/x").unwrap();
        resolve(&mut doc, "/b/0/y").unwrap();
        assert_eq!(doc, json!({"a": {"k": {}}, "b": [{}]}));
    }

    #[test]
    fn keeps_matching_intermediates() {
        let mut doc = json!({"a": {"keep": true}});
        resolve(&mut doc, "/a/b").unwrap();
        assert_eq!(doc, json!({"a": {"keep": true}}));
    }

    #[test]
    fn index_against_object_root_is_mismatch() {
        let mut doc = json!({});
        let err = resolve(&mut doc, "/0/a").unwrap_err();
        match err {
            DeltaError::StructureMismatch { pointer, expected, found } => {
                assert_eq!(pointer, "/0");
                assert_eq!(expected, "array");
                assert_eq!(found, "object");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(doc, json!({}));
    }

    #[test]
    fn key_against_array_root_is_mismatch() {
        let mut doc = json!([]);
        assert!(matches!(
            resolve(&mut doc, "/a/b"),
            Err(DeltaError::StructureMismatch { expected: "object", .. })
        ));
    }

    #[test]
    fn index_limit_is_enforced() {
        let mut doc = json!({"a": []});
        let limits = ApplyLimits { max_array_index: 4 };
        let err = resolve_parent(&mut doc, &parse_pointer("/a/5/b"), &limits).unwrap_err();
        assert!(matches!(err, DeltaError::IndexTooLarge { index: 5, max: 4 }));
        assert_eq!(doc, json!({"a": []}));
    }
}
