//! Conflict detection between edited copies of a document.
//!
//! [`detect_conflicts`] compares two live copies and reports every location
//! where they differ, with the second copy's value. Callers that also hold the
//! common ancestor can use [`three_way_conflicts`], which only reports
//! locations both sides changed in different ways.

use serde::{Deserialize, Serialize};

use crate::patch::{self, EditOp};
use crate::path::Path;
use crate::value::Value;

/// One location where the copies disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub path: Path,
    /// The edited side's value there; null when the edited side removed it.
    pub value: Value,
}

/// The `{hasConflict, conflicts}` report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub has_conflict: bool,
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// A report with no conflicts.
    pub fn none() -> Self {
        Self::default()
    }

    fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        Self {
            has_conflict: !conflicts.is_empty(),
            conflicts,
        }
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Returns true if any conflict sits at or below `path`.
    pub fn touches(&self, path: &Path) -> bool {
        self.conflicts.iter().any(|c| c.path.starts_with(path))
    }
}

fn conflict_of(op: &EditOp) -> Conflict {
    Conflict {
        path: op.path().clone(),
        value: op.value().cloned().unwrap_or(Value::Null),
    }
}

/// Reports every location where `edited` differs from `current`.
///
/// # Example
///
/// ```rust
/// use docweave::{conflict, parse, Path};
///
/// let a = parse("title: A\ncontent: X\n").unwrap();
/// let b = parse("title: B\ncontent: X\n").unwrap();
///
/// assert!(!conflict::detect_conflicts(&a, &a).has_conflict);
///
/// let report = conflict::detect_conflicts(&a, &b);
/// assert_eq!(report.conflicts[0].path, Path::from_field("title"));
/// ```
pub fn detect_conflicts(current: &Value, edited: &Value) -> ConflictReport {
    ConflictReport::from_conflicts(patch::diff(current, edited).iter().map(conflict_of).collect())
}

/// Reports the locations where `left` and `right` both changed `base` and
/// disagree on the result.
///
/// Two edits collide when one path is the other or contains it; they conflict
/// when the two sides hold different values at the outer of the two paths.
/// Each conflicting location is reported once, with the right side's value.
pub fn three_way_conflicts(base: &Value, left: &Value, right: &Value) -> ConflictReport {
    let left_ops = patch::diff(base, left);
    let right_ops = patch::diff(base, right);

    let mut conflicts: Vec<Conflict> = Vec::new();
    for r in &right_ops {
        let collides = left_ops.iter().any(|l| {
            if !l.path().overlaps(r.path()) {
                return false;
            }
            let outer = if l.path().len() <= r.path().len() {
                l.path()
            } else {
                r.path()
            };
            left.pointer(outer) != right.pointer(outer)
        });
        if collides && !conflicts.iter().any(|c| &c.path == r.path()) {
            conflicts.push(conflict_of(r));
        }
    }
    ConflictReport::from_conflicts(conflicts)
}
