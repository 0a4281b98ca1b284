//! Structural edit scripts.
//!
//! This module provides [`EditOp`] and [`Patch`], [`diff`] to compute the edit
//! script between two trees, and [`apply`] to replay one. The wire form of an
//! edit is RFC 6902 shaped:
//!
//! ```json
//! [{"op": "replace", "path": "/title", "value": "B"}]
//! ```
//!
//! # Example
//!
//! ```rust
//! use docweave::{parse, patch};
//!
//! let base = parse("title: A\ncontent: X\n").unwrap();
//! let edited = parse("title: B\ncontent: X\n").unwrap();
//!
//! let script = patch::diff(&base, &edited);
//! assert_eq!(script.to_json(), r#"[{"op":"replace","path":"/title","value":"B"}]"#);
//!
//! let outcome = patch::apply(base, &script);
//! assert_eq!(outcome.value, edited);
//! assert!(outcome.skipped.is_empty());
//! ```

mod apply;
mod diff;

use serde::{Deserialize, Serialize};

use crate::path::Path;
use crate::value::Value;

pub use apply::{apply, PatchOutcome, SkippedOp};
pub use diff::diff;

/// A single structural edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditOp {
    /// Inserts `value` at `path`, creating missing parents.
    Add {
        path: Path,
        #[serde(default)]
        value: Value,
    },
    /// Deletes the node at `path`.
    Remove { path: Path },
    /// Overwrites the existing node at `path`.
    Replace { path: Path, value: Value },
}

impl EditOp {
    pub fn add(path: Path, value: impl Into<Value>) -> Self {
        EditOp::Add {
            path,
            value: value.into(),
        }
    }

    pub fn remove(path: Path) -> Self {
        EditOp::Remove { path }
    }

    pub fn replace(path: Path, value: impl Into<Value>) -> Self {
        EditOp::Replace {
            path,
            value: value.into(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            EditOp::Add { path, .. } | EditOp::Remove { path } | EditOp::Replace { path, .. } => {
                path
            }
        }
    }

    /// The value written by the edit; `None` for removals.
    pub fn value(&self) -> Option<&Value> {
        match self {
            EditOp::Add { value, .. } | EditOp::Replace { value, .. } => Some(value),
            EditOp::Remove { .. } => None,
        }
    }

    /// The wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Add { .. } => "add",
            EditOp::Remove { .. } => "remove",
            EditOp::Replace { .. } => "replace",
        }
    }
}

/// An ordered list of edits. Later edits may depend on structure created by
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    ops: Vec<EditOp>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: EditOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditOp> {
        self.ops.iter()
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Serializes the patch as a JSON array.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parses a JSON array of edits.
    pub fn from_json(text: &str) -> Result<Self, PatchError> {
        serde_json::from_str(text).map_err(|e| PatchError::InvalidPatch(e.to_string()))
    }
}

impl From<Vec<EditOp>> for Patch {
    fn from(ops: Vec<EditOp>) -> Self {
        Self { ops }
    }
}

impl FromIterator<EditOp> for Patch {
    fn from_iter<I: IntoIterator<Item = EditOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Patch {
    type Item = EditOp;
    type IntoIter = std::vec::IntoIter<EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a EditOp;
    type IntoIter = std::slice::Iter<'a, EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Reasons an edit could not be applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    /// The edit targets a node that does not exist.
    #[error("path '{path}' does not exist")]
    PathNotFound { path: Path },

    /// A path step passes through a scalar.
    #[error("'{path}' is not a mapping or sequence")]
    NotAContainer { path: Path },

    /// A sequence step is past the end of the sequence.
    #[error("index {index} at '{path}' is out of bounds for length {len}")]
    IndexOutOfBounds { path: Path, index: usize, len: usize },

    /// A sequence step is not a decimal index.
    #[error("'{segment}' at '{path}' is not a sequence index")]
    InvalidIndex { path: Path, segment: String },

    /// Removing the root would leave no document.
    #[error("cannot remove the document root")]
    RootRemoval,

    /// The patch text is not a JSON array of edits.
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        let patch = Patch::from(vec![
            EditOp::add(Path::root().push_field("tags").push_index(0), "x"),
            EditOp::remove(Path::from_field("a~b/c")),
            EditOp::replace(Path::root(), Value::Null),
        ]);
        assert_eq!(
            patch.to_json(),
            r#"[{"op":"add","path":"/tags/0","value":"x"},{"op":"remove","path":"/a~0b~1c"},{"op":"replace","path":"","value":null}]"#
        );
        assert_eq!(Patch::from_json(&patch.to_json()).unwrap(), patch);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Patch::from_json("{\"op\":\"add\"}"),
            Err(PatchError::InvalidPatch(_))
        ));
        assert!(Patch::from_json(r#"[{"op":"move","path":"/a"}]"#).is_err());
        assert!(Patch::from_json(r#"[{"op":"replace","path":"/a"}]"#).is_err());
    }

    #[test]
    fn test_add_value_defaults_to_null() {
        let patch = Patch::from_json(r#"[{"op":"add","path":"/a"}]"#).unwrap();
        assert_eq!(patch.ops()[0].value(), Some(&Value::Null));
        assert_eq!(patch.ops()[0].name(), "add");
    }
}
