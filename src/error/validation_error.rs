//! Located validation errors.
//!
//! This module provides [`ValidationError`] for single failures and
//! [`ValidationErrors`] for accumulating multiple errors.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use stillwater::prelude::*;

use crate::error::ErrorKind;
use crate::path::Path;
use crate::position::{Position, SourceMap};

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// A single failure with full context.
///
/// `ValidationError` captures all relevant information about a failure:
/// - **line** / **column**: Where in the source text it occurred (0 = unknown)
/// - **message**: Human-readable description of the failure
/// - **path**: Where in the document tree it occurred
/// - **code**: The [`ErrorKind`] category
/// - **expected** / **got**: Optional context for constraint violations
///
/// # Example
///
/// ```rust
/// use docweave::{ErrorKind, Path, ValidationError};
///
/// let error = ValidationError::new(
///     ErrorKind::SchemaValidationError,
///     Path::root().push_field("email"),
///     "must match pattern '@'"
/// )
/// .with_line(3)
/// .with_got("not-an-email")
/// .with_expected("string matching '@'");
///
/// assert_eq!(error.code, ErrorKind::SchemaValidationError);
/// assert_eq!(error.line, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-based source line, or 0 when the location is unknown.
    pub line: u32,
    /// 1-based source column, or 0 when unknown.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub column: u32,
    /// Human-readable error message.
    pub message: String,
    /// The structural location of the offending node.
    #[serde(default)]
    pub path: Path,
    /// The failure category.
    pub code: ErrorKind,
    /// Description of what was expected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// The actual value that was received (formatted as string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub got: Option<String>,
}

impl ValidationError {
    /// Creates a new error with an unknown source position.
    pub fn new(code: ErrorKind, path: Path, message: impl Into<String>) -> Self {
        Self {
            line: 0,
            column: 0,
            message: message.into(),
            path,
            code,
            expected: None,
            got: None,
        }
    }

    /// Creates an error that has no structural location.
    pub fn unlocated(code: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(code, Path::root(), message)
    }

    /// Sets the source line and returns self for chaining.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Sets line and column from a [`Position`].
    pub fn with_position(mut self, position: Position) -> Self {
        self.line = position.line;
        self.column = position.column;
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the "got" (actual value) field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Fills in an unknown line from the source map entry of this error's path.
    pub fn locate(mut self, source_map: &SourceMap) -> Self {
        if self.line == 0 {
            let position = source_map.position_of(&self.path);
            self.line = position.line;
            self.column = position.column;
        }
        self
    }

    /// Shifts a known line down by `lines`.
    pub fn offset_lines(mut self, lines: u32) -> Self {
        if self.line > 0 {
            self.line += lines;
        }
        self
    }

    /// Returns the source position carried by this error.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.dotted()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }
        if self.line > 0 {
            write!(f, " at line {}", self.line)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// A non-empty collection of validation errors.
///
/// `ValidationErrors` wraps a `NonEmptyVec<ValidationError>` to guarantee that
/// at least one error is present, which is what a `Validation` failure needs.
///
/// # Combining Errors
///
/// `ValidationErrors` implements `Semigroup`, allowing errors from multiple
/// checks to be combined:
///
/// ```rust
/// use docweave::{ErrorKind, Path, ValidationError, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let errors1 = ValidationErrors::single(ValidationError::new(
///     ErrorKind::SchemaValidationError,
///     Path::root().push_field("name"),
///     "required",
/// ));
/// let errors2 = ValidationErrors::single(ValidationError::new(
///     ErrorKind::SchemaValidationError,
///     Path::root().push_field("email"),
///     "invalid format",
/// ));
///
/// let combined = errors1.combine(errors2);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Creates a `ValidationErrors` containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns all errors at the specified path.
    pub fn at_path(&self, path: &Path) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors of the specified kind.
    pub fn with_code(&self, code: ErrorKind) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }

    /// Applies `f` to every error, keeping the collection non-empty.
    pub fn map(self, f: impl FnMut(ValidationError) -> ValidationError) -> Self {
        Self::from_vec(self.into_vec().into_iter().map(f).collect())
    }

    /// Creates a `ValidationErrors` from a `Vec<ValidationError>`.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Self {
        Self(NonEmptyVec::from_vec(errors).expect("ValidationErrors requires at least one error"))
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationErrors>();
    assert_sync::<ValidationErrors>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_error(path: Path, message: &str) -> ValidationError {
        ValidationError::new(ErrorKind::SchemaValidationError, path, message)
    }

    #[test]
    fn test_error_creation_defaults() {
        let error = schema_error(Path::root().push_field("name"), "field is required");

        assert_eq!(error.path, Path::root().push_field("name"));
        assert_eq!(error.message, "field is required");
        assert_eq!(error.line, 0);
        assert!(error.got.is_none());
        assert!(error.expected.is_none());
    }

    #[test]
    fn test_error_display() {
        let error = schema_error(Path::root().push_field("email"), "invalid format")
            .with_expected("email address")
            .with_got("not-an-email")
            .with_line(4);

        let display = error.to_string();
        assert!(display.contains("email: invalid format"));
        assert!(display.contains("expected: email address"));
        assert!(display.contains("got: not-an-email"));
        assert!(display.contains("at line 4"));
    }

    #[test]
    fn test_error_display_root() {
        let error = ValidationError::unlocated(ErrorKind::ParseError, "unexpected end");
        assert!(error.to_string().contains("(root): unexpected end"));
    }

    #[test]
    fn test_locate_uses_source_map() {
        let mut map = SourceMap::new();
        map.record(Path::root(), Position::new(1, 1));
        map.record(Path::from_field("title"), Position::new(2, 1));

        let located = schema_error(Path::from_field("title"), "bad").locate(&map);
        assert_eq!(located.line, 2);

        let explicit = schema_error(Path::from_field("title"), "bad")
            .with_line(9)
            .locate(&map);
        assert_eq!(explicit.line, 9);
    }

    #[test]
    fn test_serialized_shape() {
        let error = schema_error(Path::from_field("title"), "required field 'title' is missing")
            .with_line(1);
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "line": 1,
                "message": "required field 'title' is missing",
                "path": "/title",
                "code": "SchemaValidationError"
            })
        );
    }

    #[test]
    fn test_errors_combine_and_filter() {
        let path_a = Path::from_field("a");
        let errors = ValidationErrors::single(schema_error(path_a.clone(), "1"))
            .combine(ValidationErrors::single(schema_error(path_a.clone(), "2")))
            .combine(ValidationErrors::single(ValidationError::unlocated(
                ErrorKind::ParseError,
                "3",
            )));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.at_path(&path_a).len(), 2);
        assert_eq!(errors.with_code(ErrorKind::ParseError).len(), 1);
        assert_eq!(errors.first().message, "1");
    }

    #[test]
    fn test_errors_map_and_display() {
        let errors = ValidationErrors::from_vec(vec![
            schema_error(Path::from_field("name"), "required"),
            schema_error(Path::from_field("email"), "invalid"),
        ])
        .map(|e| e.with_line(7));

        assert!(errors.iter().all(|e| e.line == 7));
        let display = errors.to_string();
        assert!(display.contains("2 error(s)"));
        assert!(display.contains("name: required"));
    }

    #[test]
    fn test_semigroup_associativity() {
        let e = |m: &str| ValidationErrors::single(schema_error(Path::root(), m));

        let left = e("1").combine(e("2")).combine(e("3"));
        let right = e("1").combine(e("2").combine(e("3")));

        let left_msgs: Vec<_> = left.iter().map(|e| &e.message).collect();
        let right_msgs: Vec<_> = right.iter().map(|e| &e.message).collect();
        assert_eq!(left_msgs, right_msgs);
    }
}
