// ── Nested path model ──
//
// Dotted-path reads over the panel state tree and construction of the
// minimal partial-update document for a single leaf. Pure functions only.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::CoreError;

/// Read the value at `path`, walking one segment at a time.
///
/// Returns `None` as soon as a segment is missing or the current node is not
/// an object. An empty path yields the tree itself.
pub fn get<'a, S: AsRef<str>>(tree: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter()
        .try_fold(tree, |node, segment| node.as_object()?.get(segment.as_ref()))
}

/// Like [`get`], substituting `default` when the path does not resolve.
pub fn get_or<S: AsRef<str>>(tree: &Value, path: &[S], default: Value) -> Value {
    get(tree, path).cloned().unwrap_or(default)
}

/// Build the minimal nested document that sets `value` at `path`.
///
/// Every intermediate segment becomes a single-entry object; the last segment
/// maps directly to `value`.
pub fn build_partial<S: AsRef<str>>(path: &[S], value: Value) -> Result<Value, CoreError> {
    if path.is_empty() {
        return Err(CoreError::EmptyPath);
    }
    Ok(nest(path, value))
}

fn nest<S: AsRef<str>>(path: &[S], value: Value) -> Value {
    path.iter().rev().fold(value, |inner, segment| {
        let mut map = Map::with_capacity(1);
        map.insert(segment.as_ref().to_owned(), inner);
        Value::Object(map)
    })
}

// ── ValuePath ────────────────────────────────────────────────────────

/// A non-empty sequence of keys identifying a node of the state tree.
///
/// Displays and parses as dotted text: `Device.Display.CurrentState`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValuePath(Vec<String>);

impl ValuePath {
    /// Build a path from its segments. Fails on an empty sequence.
    pub fn new<I, S>(segments: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(CoreError::EmptyPath);
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The last segment: the property name the panel reports on writes.
    pub fn leaf(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// All segments but the last.
    pub fn parent(&self) -> &[String] {
        self.0.split_last().map_or(&[], |(_, parent)| parent)
    }

    /// Dotted form of [`parent`](Self::parent); empty for single-segment paths.
    pub fn parent_dotted(&self) -> String {
        self.parent().join(".")
    }

    /// Read this path from a tree.
    pub fn get<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        get(tree, &self.0)
    }

    /// Build the partial-update document for this path.
    pub fn build_partial(&self, value: Value) -> Value {
        nest(&self.0, value)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for ValuePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CoreError::EmptyPath);
        }
        if s.split('.').any(str::is_empty) {
            return Err(CoreError::InvalidPath { input: s.into() });
        }
        Self::new(s.split('.'))
    }
}
