//! Frontmatter extraction and validation.
//!
//! A frontmatter block is a `---` line at the very start of a document, a body
//! written in the document syntax, and a closing `---` line:
//!
//! ```text
//! ---
//! schema_path: ./schemas/note.yaml
//! validated: true
//! ---
//! # Title
//! ```
//!
//! [`extract_frontmatter`] is lenient and returns `None` for anything it cannot
//! use. [`check_frontmatter`] reports every problem with its document line.

use stillwater::Validation;

use crate::error::{
    collect_errors, ErrorKind, Validated, ValidationError, ValidationErrors, ValidationResult,
};
use crate::path::Path;
use crate::position::SourceMap;
use crate::syntax::{self, ParseError};
use crate::value::{Mapping, Value};

const MARKER: &str = "---";

/// Message reported when no block is present.
pub const MISSING_MESSAGE: &str = "frontmatter block not found or incomplete";

/// The recognized fields of a frontmatter block.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    /// Path of the schema the document should be validated against.
    pub schema_path: Option<String>,
    /// False only when the block says `validated: false`.
    pub validated: bool,
    /// Unrecognized keys, in block order.
    pub extra: Mapping,
    /// The block body as written, without the markers.
    pub raw: String,
}

impl Frontmatter {
    fn from_mapping(mut map: Mapping, raw: &str) -> Self {
        let schema_path = match map.shift_remove("schema_path") {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        let validated = !matches!(map.shift_remove("validated"), Some(Value::Bool(false)));
        Self {
            schema_path,
            validated,
            extra: map,
            raw: raw.to_string(),
        }
    }

    /// Rebuilds the block body as a mapping, recognized keys first.
    pub fn to_mapping(&self) -> Mapping {
        let mut map = Mapping::new();
        if let Some(path) = &self.schema_path {
            map.insert("schema_path".to_string(), Value::from(path.as_str()));
        }
        if !self.validated {
            map.insert("validated".to_string(), Value::Bool(false));
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

/// Where the block sits in the document.
enum Block<'a> {
    Absent,
    Unterminated,
    Closed { body: &'a str, rest: &'a str },
}

fn is_marker(line: &str) -> bool {
    line.trim_end() == MARKER
}

fn locate(text: &str) -> Block<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Block::Absent;
    };
    if !is_marker(first) {
        return Block::Absent;
    }

    let body_start = first.len();
    let mut offset = body_start;
    for line in lines {
        if is_marker(line) {
            return Block::Closed {
                body: &text[body_start..offset],
                rest: &text[offset + line.len()..],
            };
        }
        offset += line.len();
    }
    Block::Unterminated
}

/// Body parse result with positions shifted to document lines.
fn parse_body(body: &str) -> Result<(Mapping, SourceMap), ParseOutcome> {
    match syntax::parse_with_source_map(body) {
        Ok((Value::Mapping(map), source_map)) => Ok((map, source_map)),
        Ok((Value::Null, source_map)) => Ok((Mapping::new(), source_map)),
        Ok((other, _)) => Err(ParseOutcome::NotMapping(other.type_name())),
        Err(err) => Err(ParseOutcome::Syntax(err)),
    }
}

enum ParseOutcome {
    NotMapping(&'static str),
    Syntax(ParseError),
}

/// Extracts the frontmatter block, if there is a usable one.
///
/// Returns `None` when the block is absent, unterminated, unparseable, or its
/// body is not a mapping.
///
/// # Example
///
/// ```rust
/// use docweave::frontmatter::extract_frontmatter;
///
/// let fm = extract_frontmatter("---\nschema_path: ./s.yaml\n---\n# T\n").unwrap();
/// assert_eq!(fm.schema_path.as_deref(), Some("./s.yaml"));
/// assert!(fm.validated);
///
/// assert!(extract_frontmatter("# T\n").is_none());
/// ```
pub fn extract_frontmatter(text: &str) -> Option<Frontmatter> {
    split_frontmatter(text).0
}

/// Splits a document into its frontmatter and the text that follows it.
///
/// When there is no usable block the whole text is returned as the remainder.
pub fn split_frontmatter(text: &str) -> (Option<Frontmatter>, &str) {
    match leading_block(text) {
        Some((map, body, rest)) => (Some(Frontmatter::from_mapping(map, body)), rest),
        None => (None, text),
    }
}

/// Returns the block body as parsed, the raw body, and the remaining text.
pub(crate) fn leading_block(text: &str) -> Option<(Mapping, &str, &str)> {
    match locate(text) {
        Block::Closed { body, rest } => parse_body(body).ok().map(|(map, _)| (map, body, rest)),
        _ => None,
    }
}

/// Parses and validates the frontmatter block of a document.
///
/// Every problem found is reported:
/// - no block: `FrontmatterParseError`, unless `allow_missing` is set
/// - no closing marker: `FrontmatterValidationError` at line 1
/// - unparseable body: `FrontmatterParseError` at the offending line
/// - body not a mapping, empty or non-string `schema_path`, non-boolean
///   `validated`: `FrontmatterValidationError`
pub fn check_frontmatter(text: &str, allow_missing: bool) -> Validated<Option<Frontmatter>> {
    let body = match locate(text) {
        Block::Absent if allow_missing => return Validation::Success(None),
        Block::Absent => {
            return Validation::Failure(ValidationErrors::single(ValidationError::unlocated(
                ErrorKind::FrontmatterParseError,
                MISSING_MESSAGE,
            )))
        }
        Block::Unterminated => {
            return Validation::Failure(ValidationErrors::single(
                ValidationError::unlocated(
                    ErrorKind::FrontmatterValidationError,
                    "frontmatter block is not closed by a '---' line",
                )
                .with_line(1),
            ))
        }
        Block::Closed { body, .. } => body,
    };

    let (map, source_map) = match parse_body(body) {
        Ok(parsed) => parsed,
        Err(ParseOutcome::Syntax(err)) => {
            return Validation::Failure(ValidationErrors::single(
                ValidationError::unlocated(
                    ErrorKind::FrontmatterParseError,
                    format!("could not parse frontmatter: {}", err.detail()),
                )
                .with_position(err.position().offset_lines(1)),
            ))
        }
        Err(ParseOutcome::NotMapping(type_name)) => {
            return Validation::Failure(ValidationErrors::single(
                ValidationError::unlocated(
                    ErrorKind::FrontmatterValidationError,
                    format!("frontmatter must be a mapping, got {}", type_name),
                )
                .with_line(2),
            ))
        }
    };

    let errors = field_errors(&map)
        .into_iter()
        .map(|e| e.locate(&source_map).offset_lines(1))
        .collect();
    match collect_errors(errors) {
        Validation::Success(()) => Validation::Success(Some(Frontmatter::from_mapping(map, body))),
        Validation::Failure(errors) => Validation::Failure(errors),
    }
}

fn field_errors(map: &Mapping) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    match map.get("schema_path") {
        None => {}
        Some(Value::String(s)) if !s.trim().is_empty() => {}
        Some(other) => errors.push(
            ValidationError::new(
                ErrorKind::FrontmatterValidationError,
                Path::from_field("schema_path"),
                "'schema_path' must be a non-empty string",
            )
            .with_got(describe(other)),
        ),
    }
    match map.get("validated") {
        None | Some(Value::Bool(_)) => {}
        Some(other) => errors.push(
            ValidationError::new(
                ErrorKind::FrontmatterValidationError,
                Path::from_field("validated"),
                "'validated' must be true or false",
            )
            .with_expected("boolean")
            .with_got(describe(other)),
        ),
    }
    errors
}

fn describe(value: &Value) -> String {
    match value.scalar_text() {
        Some(text) if !text.is_empty() => text,
        _ => value.type_name().to_string(),
    }
}

/// Validates the frontmatter block, requiring one to be present.
///
/// # Example
///
/// ```rust
/// use docweave::frontmatter::parse_and_validate_frontmatter;
///
/// let ok = parse_and_validate_frontmatter(
///     "---\nschema_path: ./s.yaml\nvalidated: true\n---\n# T",
/// );
/// assert!(ok.is_success());
///
/// let bad = parse_and_validate_frontmatter("---\nvalidated: invalid_value\n---\n# T");
/// assert!(!bad.is_success());
/// ```
pub fn parse_and_validate_frontmatter(text: &str) -> ValidationResult {
    ValidationResult::from_validation(check_frontmatter(text, false))
}
