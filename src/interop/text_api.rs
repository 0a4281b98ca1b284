use serde::Serialize;

use crate::engine::Engine;
use crate::error::{ErrorKind, ValidationError, ValidationResult};
use crate::patch::Patch;
use crate::value::Value;

use super::ToEnvelope;

#[derive(Serialize)]
struct ParseEnvelope<'a> {
    success: bool,
    content: &'a Value,
}

/// String-typed wrapper around an [`Engine`].
///
/// | Operation | Returns |
/// |---|---|
/// | `parse` | `{"success":true,"content":<tree>}` or failure envelope |
/// | `serialize` | document text or failure envelope |
/// | `validate`, `compile_schema`, `parse_and_validate_frontmatter` | `{"success","errors"}` |
/// | `structured_to_tree` | tree JSON |
/// | `tree_to_structured` | heading text or failure envelope |
/// | `diff` | JSON array of edits |
/// | `apply_patch` | document text |
/// | `detect_conflicts` | `{"hasConflict","conflicts"}` |
///
/// # Example
///
/// ```rust
/// use docweave::TextApi;
///
/// let api = TextApi::new();
/// assert_eq!(api.parse("a: 1\n"), r#"{"success":true,"content":{"a":1}}"#);
///
/// let patch = api.diff("title: A\ncontent: X\n", "title: B\ncontent: X\n");
/// assert_eq!(patch, r#"[{"op":"replace","path":"/title","value":"B"}]"#);
/// assert_eq!(
///     api.apply_patch("title: A\ncontent: X\n", &patch),
///     "title: B\ncontent: X\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextApi {
    engine: Engine,
}

impl TextApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn version(&self) -> String {
        Engine::version().to_string()
    }

    /// Parses document text into a tree envelope.
    pub fn parse(&self, text: &str) -> String {
        match self.engine.parse(text) {
            Ok(value) => {
                let envelope = ParseEnvelope {
                    success: true,
                    content: &value,
                };
                serde_json::to_string(&envelope).unwrap_or_else(|e| {
                    failure(ValidationError::unlocated(
                        ErrorKind::Unknown,
                        format!("could not encode tree: {}", e),
                    ))
                })
            }
            Err(error) => failure(error),
        }
    }

    /// Renders a JSON tree as document text.
    pub fn serialize(&self, tree_json: &str) -> String {
        match tree_from_json(tree_json) {
            Ok(tree) => self.engine.serialize(&tree),
            Err(error) => failure(error),
        }
    }

    pub fn validate(&self, text: &str, schema_text: &str) -> String {
        self.engine.validate(text, schema_text).to_envelope()
    }

    pub fn compile_schema(&self, schema_text: &str) -> String {
        self.engine.compile_schema(schema_text).to_envelope()
    }

    pub fn parse_and_validate_frontmatter(&self, text: &str) -> String {
        self.engine.parse_and_validate_frontmatter(text).to_envelope()
    }

    /// Converts heading-structured text into tree JSON.
    pub fn structured_to_tree(&self, text: &str) -> String {
        let tree = self.engine.structured_to_tree(text);
        serde_json::to_string(&tree).unwrap_or_else(|_| "{}".to_string())
    }

    /// Converts tree JSON into heading-structured text.
    pub fn tree_to_structured(&self, tree_json: &str) -> String {
        match tree_from_json(tree_json) {
            Ok(tree) => self.engine.tree_to_structured(&tree),
            Err(error) => failure(error),
        }
    }

    pub fn diff(&self, base_text: &str, edited_text: &str) -> String {
        self.engine.diff(base_text, edited_text).to_envelope()
    }

    /// Applies a JSON patch. Unparseable document or patch text returns the
    /// document text unchanged.
    pub fn apply_patch(&self, text: &str, patch_json: &str) -> String {
        match Patch::from_json(patch_json) {
            Ok(patch) => self.engine.apply_patch(text, &patch),
            Err(error) => {
                tracing::warn!(error = %error, "patch does not parse, returning document unchanged");
                text.to_string()
            }
        }
    }

    pub fn detect_conflicts(&self, current_text: &str, edited_text: &str) -> String {
        self.engine
            .detect_conflicts(current_text, edited_text)
            .to_envelope()
    }

    pub fn three_way_conflicts(&self, base_text: &str, left_text: &str, right_text: &str) -> String {
        self.engine
            .three_way_conflicts(base_text, left_text, right_text)
            .to_envelope()
    }
}

fn tree_from_json(text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|e| {
        ValidationError::unlocated(ErrorKind::ParseError, format!("invalid tree JSON: {}", e))
            .with_line(e.line() as u32)
    })
}

fn failure(error: ValidationError) -> String {
    ValidationResult::single(error).to_envelope()
}
