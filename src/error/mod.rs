//! Error types for engine operations.
//!
//! This module provides the closed [`ErrorKind`] taxonomy, [`ValidationError`]
//! for a single located problem, the non-empty [`ValidationErrors`]
//! accumulator, and the [`ValidationResult`] report returned at the boundary.

mod kind;
mod report;
mod validation_error;

pub use kind::ErrorKind;
pub use report::ValidationResult;
pub use validation_error::{ValidationError, ValidationErrors};

use stillwater::Validation;

/// Accumulating validation outcome used throughout the engine.
pub type Validated<T> = Validation<T, ValidationErrors>;

/// Turns a list of collected errors into a `Validated<()>`.
pub(crate) fn collect_errors(errors: Vec<ValidationError>) -> Validated<()> {
    if errors.is_empty() {
        Validation::Success(())
    } else {
        Validation::Failure(ValidationErrors::from_vec(errors))
    }
}
