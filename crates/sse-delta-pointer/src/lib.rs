//! Relaxed JSON-Pointer paths as used by delta-encoded SSE streams.
//!
//! Streaming completion APIs address the document they are building with
//! pointer-like strings such as `/message/content/parts/0`. This crate turns
//! those strings into typed [`PathSegment`]s and provides read-only lookups
//! over `serde_json::Value` documents.
//!
//! The grammar is deliberately narrower than RFC 6901:
//!
//! - the empty string is the root;
//! - one leading and one trailing `/` are optional and stripped;
//! - a token made of ASCII digits is an array index, anything else is a key;
//! - `~0` / `~1` escapes are **not** decoded, so a key containing a literal
//!   `/` cannot be addressed.
//!
//! # Example
//!
//! ```
//! use sse_delta_pointer::{format_pointer, get, parse_pointer, PathSegment};
//!
//! let path = parse_pointer("/choices/0/text");
//! assert_eq!(
//!     path,
//!     vec![
//!         PathSegment::Key("choices".into()),
//!         PathSegment::index(0),
//!         PathSegment::Key("text".into()),
//!     ]
//! );
//! assert_eq!(format_pointer(&path), "/choices/0/text");
//!
//! let doc = serde_json::json!({"choices": [{"text": "hi"}]});
//! assert_eq!(get(&doc, &path), Some(&serde_json::json!("hi")));
//! ```

use serde_json::Value;

pub mod types;
pub use types::{is_integer, Path, PathSegment};

/// Parse a pointer string into path segments.
///
/// Never fails: every string maps to some path.
///
/// ```
/// use sse_delta_pointer::{parse_pointer, PathSegment};
///
/// assert!(parse_pointer("").is_empty());
/// assert_eq!(parse_pointer("a/b"), parse_pointer("/a/b"));
/// assert_eq!(parse_pointer("/a/b/"), parse_pointer("/a/b"));
/// assert_eq!(parse_pointer("/"), vec![PathSegment::Key(String::new())]);
/// ```
pub fn parse_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    let body = body.strip_suffix('/').unwrap_or(body);
    body.split('/').map(PathSegment::from_token).collect()
}

/// Format path segments back into a pointer string.
///
/// Returns an empty string for the root path. Segments are written verbatim.
///
/// ```
/// use sse_delta_pointer::{format_pointer, PathSegment};
///
/// assert_eq!(format_pointer(&[]), "");
/// assert_eq!(format_pointer(&[PathSegment::Key("a".into()), PathSegment::index(2)]), "/a/2");
/// ```
pub fn format_pointer(path: &[PathSegment]) -> String {
    let mut out = String::with_capacity(path.len() * 8);
    for segment in path {
        out.push('/');
        out.push_str(segment.as_key());
    }
    out
}

/// Check if a path points to the root value.
pub fn is_root(path: &[PathSegment]) -> bool {
    path.is_empty()
}

/// Get a value from a JSON document by path.
///
/// Returns `None` if any step is missing or traverses a scalar. An index
/// segment applied to an object looks up its token as a key.
pub fn get<'a>(val: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut current = val;
    for segment in path {
        current = match (current, segment) {
            (Value::Array(arr), PathSegment::Index { index, .. }) => arr.get(*index)?,
            (Value::Object(map), segment) => map.get(segment.as_key())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Look up a value by pointer string directly.
pub fn get_by_pointer<'a>(val: &'a Value, pointer: &str) -> Option<&'a Value> {
    get(val, &parse_pointer(pointer))
}
