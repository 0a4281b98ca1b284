//! Array keyword validation.
//!
//! This module provides [`ArraySchema`] for the `items`, `minItems` and
//! `maxItems` keywords.

use rayon::prelude::*;

use crate::error::{collect_errors, ErrorKind, Validated, ValidationError};
use crate::path::Path;
use crate::value::Value;

use super::traits::{extend_errors, SchemaLike};
use super::SchemaNode;

/// A constraint applied to sequence values.
#[derive(Debug, Clone, Copy)]
enum ArrayConstraint {
    MinItems { min: usize },
    MaxItems { max: usize },
}

/// Sequence keywords of a schema node.
///
/// Every item is checked against the item schema; items are processed in
/// parallel and their errors reported in item order. Length violations come
/// first. Non-sequences pass.
///
/// # Example
///
/// ```rust
/// use docweave::schema::{ArraySchema, SchemaLike, SchemaNode, SchemaType};
/// use docweave::{parse, Path};
///
/// let schema = ArraySchema::new(SchemaNode::of_type(SchemaType::String)).min_items(1);
///
/// assert!(schema.validate(&parse("[a, b]").unwrap(), &Path::root()).is_success());
/// assert!(schema.validate(&parse("[]").unwrap(), &Path::root()).is_failure());
/// assert!(schema.validate(&parse("[a, 2]").unwrap(), &Path::root()).is_failure());
/// ```
#[derive(Debug, Clone)]
pub struct ArraySchema {
    item_schema: Box<SchemaNode>,
    constraints: Vec<ArrayConstraint>,
}

impl ArraySchema {
    /// Creates a new array schema with the given item schema.
    pub fn new(item_schema: SchemaNode) -> Self {
        Self {
            item_schema: Box::new(item_schema),
            constraints: Vec::new(),
        }
    }

    /// Adds a minimum item count.
    pub fn min_items(mut self, min: usize) -> Self {
        self.constraints.push(ArrayConstraint::MinItems { min });
        self
    }

    /// Adds a maximum item count.
    pub fn max_items(mut self, max: usize) -> Self {
        self.constraints.push(ArrayConstraint::MaxItems { max });
        self
    }

    /// Requires at least one item; equivalent to `.min_items(1)`.
    pub fn non_empty(self) -> Self {
        self.min_items(1)
    }
}

impl SchemaLike for ArraySchema {
    fn validate(&self, value: &Value, path: &Path) -> Validated<()> {
        let Some(arr) = value.as_sequence() else {
            return collect_errors(Vec::new());
        };

        let mut errors = Vec::new();

        for constraint in &self.constraints {
            match *constraint {
                ArrayConstraint::MinItems { min } if arr.len() < min => {
                    errors.push(
                        ValidationError::new(
                            ErrorKind::SchemaValidationError,
                            path.clone(),
                            format!("item count must be at least {}, got {}", min, arr.len()),
                        )
                        .with_expected(format!("at least {} items", min))
                        .with_got(format!("{} items", arr.len())),
                    );
                }
                ArrayConstraint::MaxItems { max } if arr.len() > max => {
                    errors.push(
                        ValidationError::new(
                            ErrorKind::SchemaValidationError,
                            path.clone(),
                            format!("item count must be at most {}, got {}", max, arr.len()),
                        )
                        .with_expected(format!("at most {} items", max))
                        .with_got(format!("{} items", arr.len())),
                    );
                }
                _ => {}
            }
        }

        let item_results: Vec<Validated<()>> = arr
            .par_iter()
            .enumerate()
            .map(|(index, item)| self.item_schema.validate(item, &path.push_index(index)))
            .collect();
        for result in item_results {
            extend_errors(&mut errors, result);
        }

        collect_errors(errors)
    }
}
