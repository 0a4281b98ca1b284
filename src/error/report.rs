//! The `{success, errors}` report returned by validating operations.

use serde::{Deserialize, Serialize};
use stillwater::Validation;

use crate::error::{ErrorKind, ValidationError, ValidationErrors};

/// Outcome of a validating operation.
///
/// `success` is true exactly when `errors` is empty; the constructors keep the
/// two in step.
///
/// # Example
///
/// ```rust
/// use docweave::{ErrorKind, ValidationError, ValidationResult};
///
/// let ok = ValidationResult::success();
/// assert!(ok.is_success());
/// assert_eq!(ok.to_json(), r#"{"success":true,"errors":[]}"#);
///
/// let failed = ValidationResult::single(
///     ValidationError::unlocated(ErrorKind::ParseError, "unexpected end of input"),
/// );
/// assert!(!failed.is_success());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    success: bool,
    errors: Vec<ValidationError>,
}

const FALLBACK_JSON: &str = r#"{"success":false,"errors":[{"line":0,"message":"failed to serialize errors","path":"","code":"Unknown"}]}"#;

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            errors: errors.into_vec(),
        }
    }

    pub fn single(error: ValidationError) -> Self {
        Self::failure(ValidationErrors::single(error))
    }

    /// Builds a report from a possibly empty list of errors.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
        }
    }

    /// Discards the success value of a validation and keeps its errors.
    pub fn from_validation<T>(validation: Validation<T, ValidationErrors>) -> Self {
        match validation {
            Validation::Success(_) => Self::success(),
            Validation::Failure(errors) => Self::failure(errors),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Returns true if any error has the given kind.
    pub fn has_code(&self, code: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Serializes the report as the boundary JSON envelope.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| FALLBACK_JSON.to_string())
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

impl From<ValidationErrors> for ValidationResult {
    fn from(errors: ValidationErrors) -> Self {
        Self::failure(errors)
    }
}

impl From<ValidationError> for ValidationResult {
    fn from(error: ValidationError) -> Self {
        Self::single(error)
    }
}
