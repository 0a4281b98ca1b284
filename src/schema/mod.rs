//! Schema compilation and validation.
//!
//! A schema is itself a document, written in the same syntax, using a
//! JSON-Schema-like vocabulary (`type`, `properties`, `required`,
//! `additionalProperties`, `items`, `minItems`, `maxItems`, `pattern`,
//! `minLength`, `maxLength`, `enum`, `minimum`, `maximum`). [`compile`] checks
//! that a schema is well formed and turns it into a [`CompiledSchema`];
//! every problem found is reported as a `SchemaCompileError`. Validation of
//! documents accumulates all violations rather than stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use docweave::schema;
//! use docweave::{parse, ErrorKind};
//!
//! let compiled = schema::compile_text(
//!     "type: object\nproperties:\n  title:\n    type: string\nrequired: [title]\n",
//! )
//! .into_result()
//! .unwrap();
//!
//! let doc = parse("content: x\n").unwrap();
//! let errors = compiled.validate(&doc).into_result().unwrap_err();
//! assert_eq!(errors.first().code, ErrorKind::SchemaValidationError);
//! ```

mod array;
mod compile;
mod numeric;
mod object;
mod string;
mod traits;

use std::fmt::{self, Display};

use stillwater::Validation;

use crate::error::{collect_errors, ErrorKind, Validated, ValidationError};
use crate::path::Path;
use crate::position::SourceMap;
use crate::value::Value;

pub use array::ArraySchema;
pub use compile::{compile, compile_text, SCHEMA_ERROR_PREFIX};
pub use numeric::NumberSchema;
pub use object::{AdditionalProperties, ObjectSchema};
pub use string::StringSchema;
pub use traits::SchemaLike;

use traits::extend_errors;

/// The closed set of values accepted by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl SchemaType {
    pub const ALL: [SchemaType; 7] = [
        SchemaType::Object,
        SchemaType::Array,
        SchemaType::String,
        SchemaType::Number,
        SchemaType::Integer,
        SchemaType::Boolean,
        SchemaType::Null,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Returns true if `value` is an instance of this type.
    ///
    /// `integer` accepts floats with no fractional part; `number` accepts
    /// every numeric value.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (SchemaType::Object, Value::Mapping(_)) => true,
            (SchemaType::Array, Value::Sequence(_)) => true,
            (SchemaType::String, Value::String(_)) => true,
            (SchemaType::Number, Value::Number(_)) => true,
            (SchemaType::Integer, Value::Number(n)) => n.is_integral(),
            (SchemaType::Boolean, Value::Bool(_)) => true,
            (SchemaType::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compiled schema node: its accepted types and the keyword schemas that
/// apply once the type matches.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    types: Vec<SchemaType>,
    enumeration: Option<Vec<Value>>,
    string: StringSchema,
    number: NumberSchema,
    object: Option<ObjectSchema>,
    array: Option<ArraySchema>,
}

impl SchemaNode {
    /// A node that accepts any value.
    pub fn any() -> Self {
        Self::default()
    }

    /// A node accepting a single type.
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self::of_types(vec![schema_type])
    }

    /// A node accepting any of `types`. An empty list accepts everything.
    pub fn of_types(types: Vec<SchemaType>) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enumeration = Some(values);
        self
    }

    pub fn with_string(mut self, string: StringSchema) -> Self {
        self.string = string;
        self
    }

    pub fn with_number(mut self, number: NumberSchema) -> Self {
        self.number = number;
        self
    }

    pub fn with_object(mut self, object: ObjectSchema) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_array(mut self, array: ArraySchema) -> Self {
        self.array = Some(array);
        self
    }

    pub fn types(&self) -> &[SchemaType] {
        &self.types
    }

    fn type_error(&self, value: &Value, path: &Path) -> ValidationError {
        let expected = self
            .types
            .iter()
            .map(SchemaType::as_str)
            .collect::<Vec<_>>()
            .join(" or ");
        ValidationError::new(
            ErrorKind::SchemaValidationError,
            path.clone(),
            format!("invalid type: expected {}, got {}", expected, value.type_name()),
        )
        .with_expected(expected)
        .with_got(value.type_name())
    }

    fn enum_error(&self, allowed: &[Value], value: &Value, path: &Path) -> ValidationError {
        let allowed = allowed.iter().map(display_value).collect::<Vec<_>>().join(", ");
        ValidationError::new(
            ErrorKind::SchemaValidationError,
            path.clone(),
            format!("enum mismatch: value must be one of [{}]", allowed),
        )
        .with_expected(format!("one of [{}]", allowed))
        .with_got(display_value(value))
    }
}

impl SchemaLike for SchemaNode {
    fn validate(&self, value: &Value, path: &Path) -> Validated<()> {
        if !self.types.is_empty() && !self.types.iter().any(|t| t.accepts(value)) {
            return Validation::Failure(self.type_error(value, path).into());
        }

        let mut errors = Vec::new();
        if let Some(allowed) = &self.enumeration {
            if !allowed.iter().any(|candidate| values_equal(candidate, value)) {
                errors.push(self.enum_error(allowed, value, path));
            }
        }
        extend_errors(&mut errors, self.string.validate(value, path));
        extend_errors(&mut errors, self.number.validate(value, path));
        if let Some(object) = &self.object {
            extend_errors(&mut errors, object.validate(value, path));
        }
        if let Some(array) = &self.array {
            extend_errors(&mut errors, array.validate(value, path));
        }
        collect_errors(errors)
    }
}

/// A schema that passed compilation.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    root: SchemaNode,
}

impl CompiledSchema {
    pub fn new(root: SchemaNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Validates a document. Errors carry paths but no source lines.
    pub fn validate(&self, document: &Value) -> Validated<()> {
        self.root.validate(document, &Path::root())
    }

    /// Validates a document and fills in each error's line from the
    /// document's source map.
    pub fn validate_located(&self, document: &Value, source_map: &SourceMap) -> Validated<()> {
        match self.validate(document) {
            Validation::Success(()) => Validation::Success(()),
            Validation::Failure(errors) => {
                Validation::Failure(errors.map(|e| e.locate(source_map)))
            }
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<CompiledSchema>();
    assert_sync::<CompiledSchema>();
};

/// Structural equality where integers and floats compare by numeric value.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Sequence(xs), Value::Sequence(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Mapping(xm), Value::Mapping(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.type_name().to_string()),
    }
}
