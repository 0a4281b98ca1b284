//! Numeric keyword validation.
//!
//! This module provides [`NumberSchema`] for the inclusive `minimum` and
//! `maximum` keywords.

use crate::error::{collect_errors, ErrorKind, Validated, ValidationError};
use crate::path::Path;
use crate::value::{Number, Value};

use super::traits::SchemaLike;

/// A constraint applied to numeric values.
#[derive(Debug, Clone, Copy)]
enum NumericConstraint {
    Min { value: f64 },
    Max { value: f64 },
}

/// Numeric keywords of a schema node.
///
/// Integers and floats are compared as `f64`. Non-numbers pass.
///
/// # Example
///
/// ```rust
/// use docweave::schema::{NumberSchema, SchemaLike};
/// use docweave::{Path, Value};
///
/// let schema = NumberSchema::new().min(0.0).max(100.0);
///
/// assert!(schema.validate(&Value::from(50i64), &Path::root()).is_success());
/// assert!(schema.validate(&Value::from(-0.5f64), &Path::root()).is_failure());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    constraints: Vec<NumericConstraint>,
}

impl NumberSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a minimum value constraint (inclusive).
    pub fn min(mut self, value: f64) -> Self {
        self.constraints.push(NumericConstraint::Min { value });
        self
    }

    /// Adds a maximum value constraint (inclusive).
    pub fn max(mut self, value: f64) -> Self {
        self.constraints.push(NumericConstraint::Max { value });
        self
    }

    /// Adds both bounds.
    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl SchemaLike for NumberSchema {
    fn validate(&self, value: &Value, path: &Path) -> Validated<()> {
        let Some(n) = value.as_number() else {
            return collect_errors(Vec::new());
        };
        let errors: Vec<ValidationError> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, n, path))
            .collect();
        collect_errors(errors)
    }
}

/// Checks a single constraint and returns an error if it fails.
fn check_constraint(
    constraint: &NumericConstraint,
    n: Number,
    path: &Path,
) -> Option<ValidationError> {
    let actual = n.as_f64();
    match constraint {
        NumericConstraint::Min { value } => (actual < *value).then(|| {
            ValidationError::new(
                ErrorKind::SchemaValidationError,
                path.clone(),
                format!("value must be at least {}, got {}", value, n),
            )
            .with_expected(format!(">= {}", value))
            .with_got(n.to_string())
        }),
        NumericConstraint::Max { value } => (actual > *value).then(|| {
            ValidationError::new(
                ErrorKind::SchemaValidationError,
                path.clone(),
                format!("value must be at most {}, got {}", value, n),
            )
            .with_expected(format!("<= {}", value))
            .with_got(n.to_string())
        }),
    }
}
