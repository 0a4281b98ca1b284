//! Traits for schema polymorphism.
//!
//! This module provides the [`SchemaLike`] trait implemented by every keyword
//! schema (string, number, object, array) and by the compiled [`SchemaNode`]
//! that composes them.
//!
//! [`SchemaNode`]: super::SchemaNode

use stillwater::Validation;

use crate::error::{Validated, ValidationError};
use crate::path::Path;
use crate::value::Value;

/// A schema that can check a [`Value`] in place.
///
/// The `Send + Sync` bounds let compiled schemas be cached behind a lock and
/// shared across threads, and let sequence items be checked in parallel.
pub trait SchemaLike: Send + Sync {
    /// Validates `value`, located at `path` in the document.
    ///
    /// Returns `Validation::Success(())` when every constraint holds, or
    /// `Validation::Failure` with all violations found.
    fn validate(&self, value: &Value, path: &Path) -> Validated<()>;
}

/// Moves the errors of a failed validation into `errors`.
pub(crate) fn extend_errors(errors: &mut Vec<ValidationError>, result: Validated<()>) {
    if let Validation::Failure(found) = result {
        errors.extend(found);
    }
}
