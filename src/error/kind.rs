use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The closed set of failure categories an operation can report.
///
/// The serialized form is the variant name (`"ParseError"`,
/// `"SchemaCompileError"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed surface text.
    ParseError,
    /// The schema itself is invalid.
    SchemaCompileError,
    /// The frontmatter block is missing or its body does not parse.
    FrontmatterParseError,
    /// The frontmatter block parses but its fields are invalid.
    FrontmatterValidationError,
    /// The document violates the schema.
    SchemaValidationError,
    /// A failure with no dedicated category.
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "ParseError",
            ErrorKind::SchemaCompileError => "SchemaCompileError",
            ErrorKind::FrontmatterParseError => "FrontmatterParseError",
            ErrorKind::FrontmatterValidationError => "FrontmatterValidationError",
            ErrorKind::SchemaValidationError => "SchemaValidationError",
            ErrorKind::Unknown => "Unknown",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names_match_display() {
        for kind in [
            ErrorKind::ParseError,
            ErrorKind::SchemaCompileError,
            ErrorKind::FrontmatterParseError,
            ErrorKind::FrontmatterValidationError,
            ErrorKind::SchemaValidationError,
            ErrorKind::Unknown,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
