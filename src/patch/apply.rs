use crate::path::{Path, PathSegment};
use crate::value::{Mapping, Value};

use super::{EditOp, Patch, PatchError};

/// An edit that could not be applied, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOp {
    /// Position of the edit in the patch.
    pub index: usize,
    pub op: EditOp,
    pub reason: PatchError,
}

/// Result of replaying a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    /// The patched document.
    pub value: Value,
    /// Number of edits applied.
    pub applied: usize,
    /// Edits skipped because they did not fit the document.
    pub skipped: Vec<SkippedOp>,
}

impl PatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Applies each edit of `patch` to `document` in order.
///
/// An edit that does not fit the document (removing a missing node, replacing
/// a missing node, stepping through a scalar) is skipped and recorded; the
/// remaining edits still run. `add` creates missing intermediate mappings and
/// sequences, choosing a sequence when the next step is an index or `-`.
pub fn apply(mut document: Value, patch: &Patch) -> PatchOutcome {
    let mut applied = 0;
    let mut skipped = Vec::new();
    for (index, op) in patch.iter().enumerate() {
        match apply_op(&mut document, op) {
            Ok(()) => applied += 1,
            Err(reason) => {
                tracing::warn!(
                    index,
                    op = op.name(),
                    path = %op.path(),
                    error = %reason,
                    "skipping patch operation"
                );
                skipped.push(SkippedOp {
                    index,
                    op: op.clone(),
                    reason,
                });
            }
        }
    }
    PatchOutcome {
        value: document,
        applied,
        skipped,
    }
}

fn apply_op(document: &mut Value, op: &EditOp) -> Result<(), PatchError> {
    match op {
        EditOp::Add { path, value } => add(document, path, value.clone()),
        EditOp::Remove { path } => remove(document, path),
        EditOp::Replace { path, value } => {
            let slot = document
                .pointer_mut(path)
                .ok_or_else(|| PatchError::PathNotFound { path: path.clone() })?;
            *slot = value.clone();
            Ok(())
        }
    }
}

fn is_append(segment: &PathSegment) -> bool {
    segment.as_key() == "-"
}

/// An empty container suited to hold `segment`.
fn container_for(segment: &PathSegment) -> Value {
    if is_append(segment) || segment.as_index().is_some() {
        Value::Sequence(Vec::new())
    } else {
        Value::Mapping(Mapping::new())
    }
}

fn sequence_index(
    segment: &PathSegment,
    len: usize,
    at: &Path,
) -> Result<usize, PatchError> {
    if is_append(segment) {
        return Ok(len);
    }
    let index = segment.as_index().ok_or_else(|| PatchError::InvalidIndex {
        path: at.clone(),
        segment: segment.as_key().into_owned(),
    })?;
    if index > len {
        return Err(PatchError::IndexOutOfBounds {
            path: at.clone(),
            index,
            len,
        });
    }
    Ok(index)
}

fn add(document: &mut Value, path: &Path, value: Value) -> Result<(), PatchError> {
    let segments: Vec<&PathSegment> = path.segments().collect();
    let Some((last, parents)) = segments.split_last() else {
        *document = value;
        return Ok(());
    };
    check_add(document, &segments)?;

    let mut node = document;
    let mut at = Path::root();
    for (depth, segment) in parents.iter().enumerate() {
        let next = segments[depth + 1];
        node = step_or_create(node, segment, next, &at)?;
        at = at.push((*segment).clone());
    }

    if node.is_null() {
        *node = container_for(last);
    }
    match node {
        Value::Mapping(map) => {
            map.insert(last.as_key().into_owned(), value);
            Ok(())
        }
        Value::Sequence(items) => {
            let index = sequence_index(last, items.len(), &at)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::NotAContainer { path: at }),
    }
}

/// Walks `segments` the way [`add`] does without changing anything, so an
/// `add` that fails partway leaves the document untouched.
fn check_add(document: &Value, segments: &[&PathSegment]) -> Result<(), PatchError> {
    let mut node = Some(document);
    let mut at = Path::root();
    for segment in segments {
        node = match node {
            Some(Value::Mapping(map)) => map.get(&*segment.as_key()),
            Some(Value::Sequence(items)) => {
                let index = sequence_index(segment, items.len(), &at)?;
                items.get(index)
            }
            // `add` puts an empty container here
            None | Some(Value::Null) => {
                if matches!(container_for(segment), Value::Sequence(_)) {
                    sequence_index(segment, 0, &at)?;
                }
                None
            }
            Some(_) => return Err(PatchError::NotAContainer { path: at }),
        };
        at = at.push((*segment).clone());
    }
    Ok(())
}

/// Descends into `segment`, creating it as a container suited to `next` when
/// missing. A null node is first turned into a container for `segment`.
fn step_or_create<'a>(
    node: &'a mut Value,
    segment: &PathSegment,
    next: &PathSegment,
    at: &Path,
) -> Result<&'a mut Value, PatchError> {
    if node.is_null() {
        *node = container_for(segment);
    }
    match node {
        Value::Mapping(map) => Ok(map
            .entry(segment.as_key().into_owned())
            .or_insert_with(|| container_for(next))),
        Value::Sequence(items) => {
            let index = sequence_index(segment, items.len(), at)?;
            if index == items.len() {
                items.push(container_for(next));
            }
            Ok(&mut items[index])
        }
        _ => Err(PatchError::NotAContainer { path: at.clone() }),
    }
}

fn remove(document: &mut Value, path: &Path) -> Result<(), PatchError> {
    let (Some(parent_path), Some(last)) = (path.parent(), path.last()) else {
        return Err(PatchError::RootRemoval);
    };
    let not_found = || PatchError::PathNotFound { path: path.clone() };
    match document.pointer_mut(&parent_path).ok_or_else(not_found)? {
        Value::Mapping(map) => map
            .shift_remove(&*last.as_key())
            .map(|_| ())
            .ok_or_else(not_found),
        Value::Sequence(items) => match last.as_index() {
            Some(index) if index < items.len() => {
                items.remove(index);
                Ok(())
            }
            _ => Err(not_found()),
        },
        _ => Err(not_found()),
    }
}
