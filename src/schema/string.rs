//! String keyword validation.
//!
//! This module provides [`StringSchema`] for the `minLength`, `maxLength` and
//! `pattern` keywords.

use regex::Regex;

use crate::error::{collect_errors, ErrorKind, Validated, ValidationError};
use crate::path::Path;
use crate::value::Value;

use super::traits::SchemaLike;

/// A constraint applied to string values.
#[derive(Debug, Clone)]
enum StringConstraint {
    MinLength { min: usize },
    MaxLength { max: usize },
    Pattern { regex: Regex, pattern_str: String },
}

/// String keywords of a schema node.
///
/// Constraints only apply to string values; anything else passes, since the
/// node's `type` keyword is checked separately. All constraint violations are
/// accumulated rather than short-circuiting on the first failure.
///
/// # Example
///
/// ```rust
/// use docweave::schema::{SchemaLike, StringSchema};
/// use docweave::{Path, Value};
///
/// let schema = StringSchema::new()
///     .min_len(3)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// let result = schema.validate(&Value::from("AB"), &Path::root());
/// // Reports both: too short AND pattern mismatch
/// assert_eq!(result.into_result().unwrap_err().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a minimum length constraint.
    ///
    /// The string must have at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints.push(StringConstraint::MinLength { min });
        self
    }

    /// Adds a maximum length constraint.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints.push(StringConstraint::MaxLength { max });
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// The pattern is unanchored: it must match somewhere in the string.
    /// Returns an error if the regex pattern is invalid.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
        });
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl SchemaLike for StringSchema {
    fn validate(&self, value: &Value, path: &Path) -> Validated<()> {
        let Some(s) = value.as_str() else {
            return collect_errors(Vec::new());
        };
        let errors: Vec<ValidationError> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, s, path))
            .collect();
        collect_errors(errors)
    }
}

/// Checks a single constraint and returns an error if it fails.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    path: &Path,
) -> Option<ValidationError> {
    match constraint {
        StringConstraint::MinLength { min } => {
            let len = value.chars().count();
            (len < *min).then(|| {
                ValidationError::new(
                    ErrorKind::SchemaValidationError,
                    path.clone(),
                    format!("length must be at least {}, got {}", min, len),
                )
                .with_expected(format!("at least {} characters", min))
                .with_got(format!("{} characters", len))
            })
        }
        StringConstraint::MaxLength { max } => {
            let len = value.chars().count();
            (len > *max).then(|| {
                ValidationError::new(
                    ErrorKind::SchemaValidationError,
                    path.clone(),
                    format!("length must be at most {}, got {}", max, len),
                )
                .with_expected(format!("at most {} characters", max))
                .with_got(format!("{} characters", len))
            })
        }
        StringConstraint::Pattern { regex, pattern_str } => {
            (!regex.is_match(value)).then(|| {
                ValidationError::new(
                    ErrorKind::SchemaValidationError,
                    path.clone(),
                    format!("pattern mismatch: must match '{}'", pattern_str),
                )
                .with_expected(format!("string matching '{}'", pattern_str))
                .with_got(value.to_string())
            })
        }
    }
}
