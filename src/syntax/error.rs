use thiserror::Error;
use yaml_rust2::scanner::ScanError;

use crate::error::{ErrorKind, ValidationError};
use crate::position::Position;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{message} at {pos}")]
    Syntax { pos: Position, message: String },

    #[error("duplicate mapping key '{key}' at {pos}")]
    DuplicateKey { pos: Position, key: String },

    #[error("mapping keys must be scalars at {pos}")]
    ComplexKey { pos: Position },

    #[error("{what} are not supported at {pos}")]
    Unsupported { pos: Position, what: &'static str },

    #[error("only one document is allowed, another starts at {pos}")]
    MultipleDocuments { pos: Position },

    #[error("document nests deeper than {max} levels at {pos}")]
    TooDeep { pos: Position, max: usize },
}

impl ParseError {
    pub fn duplicate_key(pos: Position, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            pos,
            key: key.into(),
        }
    }

    pub fn complex_key(pos: Position) -> Self {
        Self::ComplexKey { pos }
    }

    pub fn unsupported(pos: Position, what: &'static str) -> Self {
        Self::Unsupported { pos, what }
    }

    pub fn multiple_documents(pos: Position) -> Self {
        Self::MultipleDocuments { pos }
    }

    pub fn too_deep(pos: Position, max: usize) -> Self {
        Self::TooDeep { pos, max }
    }

    /// Where the problem was detected.
    pub fn position(&self) -> Position {
        match self {
            Self::Syntax { pos, .. }
            | Self::DuplicateKey { pos, .. }
            | Self::ComplexKey { pos }
            | Self::Unsupported { pos, .. }
            | Self::MultipleDocuments { pos }
            | Self::TooDeep { pos, .. } => *pos,
        }
    }

    /// The message without its position suffix.
    pub fn detail(&self) -> String {
        match self {
            Self::Syntax { message, .. } => message.clone(),
            Self::DuplicateKey { key, .. } => format!("duplicate mapping key '{}'", key),
            Self::ComplexKey { .. } => "mapping keys must be scalars".to_string(),
            Self::Unsupported { what, .. } => format!("{} are not supported", what),
            Self::MultipleDocuments { .. } => "only one document is allowed".to_string(),
            Self::TooDeep { max, .. } => format!("document nests deeper than {} levels", max),
        }
    }

    /// Converts into a located error report entry with the given code.
    pub fn into_validation_error(self, code: ErrorKind) -> ValidationError {
        ValidationError::unlocated(code, self.detail()).with_position(self.position())
    }
}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> Self {
        let marker = err.marker();
        Self::Syntax {
            pos: Position::new(marker.line() as u32, marker.col() as u32 + 1),
            message: err.info().to_string(),
        }
    }
}

impl From<ParseError> for ValidationError {
    fn from(err: ParseError) -> Self {
        err.into_validation_error(ErrorKind::ParseError)
    }
}
