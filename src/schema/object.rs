//! Object keyword validation.
//!
//! This module provides [`ObjectSchema`] for the `properties`, `required` and
//! `additionalProperties` keywords.

use indexmap::IndexMap;

use crate::error::{collect_errors, ErrorKind, Validated, ValidationError};
use crate::path::Path;
use crate::value::Value;

use super::traits::{extend_errors, SchemaLike};
use super::SchemaNode;

/// Definition of a property within an object schema.
#[derive(Debug, Clone)]
struct FieldDef {
    schema: SchemaNode,
    required: bool,
}

/// How to handle properties not declared in the schema.
#[derive(Debug, Clone, Default)]
pub enum AdditionalProperties {
    /// Allow unknown properties (default behavior).
    #[default]
    Allow,
    /// Reject unknown properties.
    Deny,
    /// Validate unknown properties against a schema.
    Validate(Box<SchemaNode>),
}

impl From<bool> for AdditionalProperties {
    fn from(allow: bool) -> Self {
        if allow {
            AdditionalProperties::Allow
        } else {
            AdditionalProperties::Deny
        }
    }
}

impl From<SchemaNode> for AdditionalProperties {
    fn from(schema: SchemaNode) -> Self {
        AdditionalProperties::Validate(Box::new(schema))
    }
}

/// Object keywords of a schema node.
///
/// Declared properties are checked against their schemas, missing required
/// properties are reported at the path they would occupy, and unknown
/// properties are handled per [`AdditionalProperties`]. All field errors are
/// accumulated. Non-mappings pass.
///
/// # Example
///
/// ```rust
/// use docweave::schema::{ObjectSchema, SchemaLike, SchemaNode, SchemaType};
/// use docweave::{parse, Path};
///
/// let schema = ObjectSchema::new()
///     .field("name", SchemaNode::of_type(SchemaType::String))
///     .optional("email", SchemaNode::of_type(SchemaType::String))
///     .additional_properties(false);
///
/// let doc = parse("name: Alice\n").unwrap();
/// assert!(schema.validate(&doc, &Path::root()).is_success());
///
/// let doc = parse("email: bob@example.com\nnickname: b\n").unwrap();
/// let errors = schema.validate(&doc, &Path::root()).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
    additional_properties: AdditionalProperties,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required property.
    pub fn field(mut self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema,
                required: true,
            },
        );
        self
    }

    /// Adds an optional property.
    pub fn optional(mut self, name: impl Into<String>, schema: SchemaNode) -> Self {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema,
                required: false,
            },
        );
        self
    }

    /// Configures how unknown properties are handled.
    pub fn additional_properties(mut self, setting: impl Into<AdditionalProperties>) -> Self {
        self.additional_properties = setting.into();
        self
    }

    /// Names of the required properties, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.required)
            .map(|(name, _)| name.as_str())
    }
}

impl SchemaLike for ObjectSchema {
    fn validate(&self, value: &Value, path: &Path) -> Validated<()> {
        let Some(obj) = value.as_mapping() else {
            return collect_errors(Vec::new());
        };

        let mut errors = Vec::new();

        for (name, field_def) in &self.fields {
            let field_path = path.push_field(name.as_str());
            match obj.get(name) {
                Some(field_value) => {
                    extend_errors(&mut errors, field_def.schema.validate(field_value, &field_path));
                }
                None if field_def.required => {
                    errors.push(
                        ValidationError::new(
                            ErrorKind::SchemaValidationError,
                            field_path,
                            format!("required field '{}' is missing", name),
                        )
                        .with_expected("value"),
                    );
                }
                None => {}
            }
        }

        for (key, value) in obj {
            if self.fields.contains_key(key) {
                continue;
            }
            let field_path = path.push_field(key.as_str());
            match &self.additional_properties {
                AdditionalProperties::Allow => {}
                AdditionalProperties::Deny => {
                    errors.push(ValidationError::new(
                        ErrorKind::SchemaValidationError,
                        field_path,
                        format!("unknown field '{}'", key),
                    ));
                }
                AdditionalProperties::Validate(schema) => {
                    extend_errors(&mut errors, schema.validate(value, &field_path));
                }
            }
        }

        collect_errors(errors)
    }
}
