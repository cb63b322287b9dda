//! Type definitions for delta pointer paths.

use std::fmt;

/// A single step of a parsed pointer.
///
/// A token made up entirely of ASCII digits addresses an array slot; every
/// other token (including the empty one) is an object key. Index segments
/// keep their original token so that `007` still names the key `"007"` when
/// the container turns out to be an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index { index: usize, token: String },
}

/// A parsed pointer. The empty path denotes the document root.
pub type Path = Vec<PathSegment>;

impl PathSegment {
    /// Classify a raw pointer token.
    ///
    /// Digit runs too long for `usize` saturate to `usize::MAX`; callers that
    /// grow arrays are expected to bound indices themselves.
    pub fn from_token(token: &str) -> Self {
        if is_integer(token) {
            PathSegment::Index {
                index: token.parse::<usize>().unwrap_or(usize::MAX),
                token: token.to_string(),
            }
        } else {
            PathSegment::Key(token.to_string())
        }
    }

    /// An index segment with its canonical decimal token.
    pub fn index(index: usize) -> Self {
        PathSegment::Index {
            index,
            token: index.to_string(),
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index { .. })
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index { index, .. } => Some(*index),
            PathSegment::Key(_) => None,
        }
    }

    /// The segment as an object key: the key itself, or the index token as
    /// it appeared in the pointer.
    pub fn as_key(&self) -> &str {
        match self {
            PathSegment::Key(k) => k,
            PathSegment::Index { token, .. } => token,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl From<&str> for PathSegment {
    fn from(token: &str) -> Self {
        PathSegment::from_token(token)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::index(index)
    }
}

/// Check if a string consists only of ASCII digits (and is non-empty).
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
