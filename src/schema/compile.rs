//! Schema well-formedness checks and compilation.

use stillwater::Validation;

use crate::error::{ErrorKind, Validated, ValidationError, ValidationErrors};
use crate::path::Path;
use crate::position::SourceMap;
use crate::syntax;
use crate::value::{Mapping, Value};

use super::{
    ArraySchema, CompiledSchema, NumberSchema, ObjectSchema, SchemaNode,
    SchemaType, StringSchema,
};

/// Prefix carried by every compile error message.
pub const SCHEMA_ERROR_PREFIX: &str = "schema error: ";

const OBJECT_KEYWORDS: &[&str] = &["properties", "required", "additionalProperties"];
const ARRAY_KEYWORDS: &[&str] = &["items", "minItems", "maxItems"];
const STRING_KEYWORDS: &[&str] = &["pattern", "minLength", "maxLength"];
const NUMBER_KEYWORDS: &[&str] = &["minimum", "maximum"];
const ANNOTATIONS: &[&str] = &[
    "title",
    "description",
    "default",
    "examples",
    "$schema",
    "$id",
    "$comment",
];

/// Parses and compiles schema text.
///
/// Unparseable text yields a single `SchemaCompileError` carrying the parse
/// position.
pub fn compile_text(text: &str) -> Validated<CompiledSchema> {
    match syntax::parse_with_source_map(text) {
        Ok((schema, source_map)) => compile(&schema, &source_map),
        Err(err) => {
            let position = err.position();
            Validation::Failure(ValidationErrors::single(
                ValidationError::unlocated(
                    ErrorKind::SchemaCompileError,
                    format!("{}could not parse schema: {}", SCHEMA_ERROR_PREFIX, err.detail()),
                )
                .with_position(position),
            ))
        }
    }
}

/// Checks that `schema` is well formed and compiles it.
///
/// All problems are reported, each located at its path inside the schema and,
/// through `source_map`, at its line in the schema text.
pub fn compile(schema: &Value, source_map: &SourceMap) -> Validated<CompiledSchema> {
    let mut compiler = Compiler { errors: Vec::new() };
    let root = compiler.node(schema, &Path::root());
    if compiler.errors.is_empty() {
        Validation::Success(CompiledSchema::new(root))
    } else {
        let errors = compiler
            .errors
            .into_iter()
            .map(|e| e.locate(source_map))
            .collect();
        Validation::Failure(ValidationErrors::from_vec(errors))
    }
}

struct Compiler {
    errors: Vec<ValidationError>,
}

impl Compiler {
    fn error(&mut self, path: Path, message: impl AsRef<str>) {
        self.errors.push(ValidationError::new(
            ErrorKind::SchemaCompileError,
            path,
            format!("{}{}", SCHEMA_ERROR_PREFIX, message.as_ref()),
        ));
    }

    fn node(&mut self, schema: &Value, path: &Path) -> SchemaNode {
        let Some(map) = schema.as_mapping() else {
            self.error(
                path.clone(),
                format!("schema must be a mapping, got {}", schema.type_name()),
            );
            return SchemaNode::any();
        };

        let types = self.types(map, path);
        self.unknown_keywords(map, path);
        self.keyword_consistency(map, &types, path);

        let mut node = SchemaNode::of_types(types.clone());
        if let Some(values) = self.enumeration(map, path) {
            node = node.with_enum(values);
        }
        node = node
            .with_string(self.string_keywords(map, path))
            .with_number(self.number_keywords(map, path));
        if types.contains(&SchemaType::Object) || map.contains_key("properties") {
            node = node.with_object(self.object_keywords(map, &types, path));
        }
        if let Some(array) = self.array_keywords(map, &types, path) {
            node = node.with_array(array);
        }
        node
    }

    fn types(&mut self, map: &Mapping, path: &Path) -> Vec<SchemaType> {
        let type_path = path.push_field("type");
        match map.get("type") {
            None => {
                self.error(path.clone(), "missing required keyword 'type'");
                Vec::new()
            }
            Some(Value::String(name)) => match SchemaType::from_name(name) {
                Some(t) => vec![t],
                None => {
                    self.error(type_path, unknown_type_message(name));
                    Vec::new()
                }
            },
            Some(Value::Sequence(names)) if !names.is_empty() => {
                let mut types = Vec::new();
                for (i, name) in names.iter().enumerate() {
                    match name.as_str().map(|n| (n, SchemaType::from_name(n))) {
                        Some((_, Some(t))) if !types.contains(&t) => types.push(t),
                        Some((_, Some(t))) => {
                            self.error(type_path.push_index(i), format!("duplicate type '{}'", t))
                        }
                        Some((n, None)) => {
                            self.error(type_path.push_index(i), unknown_type_message(n))
                        }
                        None => self.error(
                            type_path.push_index(i),
                            format!("type names must be strings, got {}", name.type_name()),
                        ),
                    }
                }
                types
            }
            Some(other) => {
                self.error(
                    type_path,
                    format!(
                        "'type' must be a string or a non-empty list of strings, got {}",
                        other.type_name()
                    ),
                );
                Vec::new()
            }
        }
    }

    fn unknown_keywords(&mut self, map: &Mapping, path: &Path) {
        for key in map.keys() {
            let known = key == "type"
                || key == "enum"
                || OBJECT_KEYWORDS.contains(&key.as_str())
                || ARRAY_KEYWORDS.contains(&key.as_str())
                || STRING_KEYWORDS.contains(&key.as_str())
                || NUMBER_KEYWORDS.contains(&key.as_str())
                || ANNOTATIONS.contains(&key.as_str());
            if !known {
                self.error(
                    path.push_field(key.as_str()),
                    format!("unrecognized keyword '{}'", key),
                );
            }
        }
    }

    /// Keywords must belong to one of the declared types.
    fn keyword_consistency(&mut self, map: &Mapping, types: &[SchemaType], path: &Path) {
        if types.is_empty() {
            return;
        }
        let groups: [(&[&str], &[SchemaType], &str); 4] = [
            (OBJECT_KEYWORDS, &[SchemaType::Object], "object"),
            (ARRAY_KEYWORDS, &[SchemaType::Array], "array"),
            (STRING_KEYWORDS, &[SchemaType::String], "string"),
            (
                NUMBER_KEYWORDS,
                &[SchemaType::Number, SchemaType::Integer],
                "number or integer",
            ),
        ];
        for (keywords, owners, owner_name) in groups {
            if owners.iter().any(|t| types.contains(t)) {
                continue;
            }
            for keyword in keywords {
                if map.contains_key(*keyword) {
                    self.error(
                        path.push_field(*keyword),
                        format!("keyword '{}' requires type {}", keyword, owner_name),
                    );
                }
            }
        }

        if types.contains(&SchemaType::Object) && !map.contains_key("properties") {
            self.error(path.clone(), "type 'object' requires 'properties'");
        }
        if types.contains(&SchemaType::Array) && !map.contains_key("items") {
            self.error(path.clone(), "type 'array' requires 'items'");
        }
    }

    fn enumeration(&mut self, map: &Mapping, path: &Path) -> Option<Vec<Value>> {
        match map.get("enum")? {
            Value::Sequence(values) if !values.is_empty() => Some(values.clone()),
            Value::Sequence(_) => {
                self.error(path.push_field("enum"), "'enum' must not be empty");
                None
            }
            other => {
                self.error(
                    path.push_field("enum"),
                    format!("'enum' must be a list, got {}", other.type_name()),
                );
                None
            }
        }
    }

    fn string_keywords(&mut self, map: &Mapping, path: &Path) -> StringSchema {
        let mut schema = StringSchema::new();
        let min = self.length_bound(map, "minLength", path);
        let max = self.length_bound(map, "maxLength", path);
        if let Some(min) = min {
            schema = schema.min_len(min);
        }
        if let Some(max) = max {
            schema = schema.max_len(max);
        }
        self.ordered_bounds(min, max, "minLength", "maxLength", path);

        match map.get("pattern") {
            None => {}
            Some(Value::String(pattern)) => match schema.clone().pattern(pattern) {
                Ok(with_pattern) => schema = with_pattern,
                Err(err) => self.error(
                    path.push_field("pattern"),
                    format!("invalid pattern '{}': {}", pattern, err),
                ),
            },
            Some(other) => self.error(
                path.push_field("pattern"),
                format!("'pattern' must be a string, got {}", other.type_name()),
            ),
        }
        schema
    }

    fn number_keywords(&mut self, map: &Mapping, path: &Path) -> NumberSchema {
        let mut schema = NumberSchema::new();
        let bound = |compiler: &mut Self, keyword: &str| match map.get(keyword) {
            None => None,
            Some(Value::Number(n)) if !n.as_f64().is_nan() => Some(n.as_f64()),
            Some(other) => {
                compiler.error(
                    path.push_field(keyword),
                    format!("'{}' must be a number, got {}", keyword, other.type_name()),
                );
                None
            }
        };
        let min = bound(self, "minimum");
        let max = bound(self, "maximum");
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                self.error(
                    path.push_field("minimum"),
                    format!("'minimum' ({}) is greater than 'maximum' ({})", lo, hi),
                );
            }
        }
        if let Some(min) = min {
            schema = schema.min(min);
        }
        if let Some(max) = max {
            schema = schema.max(max);
        }
        schema
    }

    fn object_keywords(&mut self, map: &Mapping, types: &[SchemaType], path: &Path) -> ObjectSchema {
        let mut schema = ObjectSchema::new();
        let properties_path = path.push_field("properties");

        let required = self.required(map, path);
        let declared = match map.get("properties") {
            None => None,
            Some(Value::Mapping(properties)) => Some(properties),
            Some(other) => {
                self.error(
                    properties_path.clone(),
                    format!("'properties' must be a mapping, got {}", other.type_name()),
                );
                None
            }
        };

        if let Some(properties) = declared {
            for (name, property) in properties {
                let child = self.node(property, &properties_path.push_field(name.as_str()));
                schema = if required.iter().any(|(r, _)| r == name) {
                    schema.field(name.as_str(), child)
                } else {
                    schema.optional(name.as_str(), child)
                };
            }
            for (name, index) in &required {
                if !properties.contains_key(name) {
                    self.error(
                        path.push_field("required").push_index(*index),
                        format!("required property '{}' is not declared in 'properties'", name),
                    );
                }
            }
        } else if !types.is_empty() || map.contains_key("properties") {
            for (name, index) in &required {
                self.error(
                    path.push_field("required").push_index(*index),
                    format!("required property '{}' is not declared in 'properties'", name),
                );
            }
        }

        match map.get("additionalProperties") {
            None => {}
            Some(Value::Bool(allow)) => schema = schema.additional_properties(*allow),
            Some(extra @ Value::Mapping(_)) => {
                let child = self.node(extra, &path.push_field("additionalProperties"));
                schema = schema.additional_properties(child);
            }
            Some(other) => self.error(
                path.push_field("additionalProperties"),
                format!(
                    "'additionalProperties' must be a boolean or a schema, got {}",
                    other.type_name()
                ),
            ),
        }
        schema
    }

    /// Reads `required` as (name, index) pairs, reporting malformed entries.
    fn required(&mut self, map: &Mapping, path: &Path) -> Vec<(String, usize)> {
        let required_path = path.push_field("required");
        let names = match map.get("required") {
            None => return Vec::new(),
            Some(Value::Sequence(names)) => names,
            Some(other) => {
                self.error(
                    required_path,
                    format!("'required' must be a list of strings, got {}", other.type_name()),
                );
                return Vec::new();
            }
        };

        let mut out: Vec<(String, usize)> = Vec::new();
        for (i, name) in names.iter().enumerate() {
            match name.as_str() {
                Some(n) if out.iter().any(|(seen, _)| seen == n) => self.error(
                    required_path.push_index(i),
                    format!("duplicate required property '{}'", n),
                ),
                Some(n) => out.push((n.to_string(), i)),
                None => self.error(
                    required_path.push_index(i),
                    format!("'required' entries must be strings, got {}", name.type_name()),
                ),
            }
        }
        out
    }

    fn array_keywords(
        &mut self,
        map: &Mapping,
        types: &[SchemaType],
        path: &Path,
    ) -> Option<ArraySchema> {
        let items = map.get("items");
        let min = self.length_bound(map, "minItems", path);
        let max = self.length_bound(map, "maxItems", path);
        self.ordered_bounds(min, max, "minItems", "maxItems", path);

        if items.is_none() && !types.contains(&SchemaType::Array) && min.is_none() && max.is_none()
        {
            return None;
        }
        let item_schema = match items {
            Some(items) => self.node(items, &path.push_field("items")),
            None => SchemaNode::any(),
        };
        let mut schema = ArraySchema::new(item_schema);
        if let Some(min) = min {
            schema = schema.min_items(min);
        }
        if let Some(max) = max {
            schema = schema.max_items(max);
        }
        Some(schema)
    }

    /// Reads a non-negative integer bound such as `minLength`.
    fn length_bound(&mut self, map: &Mapping, keyword: &str, path: &Path) -> Option<usize> {
        let value = map.get(keyword)?;
        match value.as_number() {
            Some(n) if n.is_integral() && n.as_f64() >= 0.0 => Some(n.as_f64() as usize),
            _ => {
                self.error(
                    path.push_field(keyword),
                    format!("'{}' must be a non-negative integer", keyword),
                );
                None
            }
        }
    }

    fn ordered_bounds(
        &mut self,
        min: Option<usize>,
        max: Option<usize>,
        min_keyword: &str,
        max_keyword: &str,
        path: &Path,
    ) {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                self.error(
                    path.push_field(min_keyword),
                    format!(
                        "'{}' ({}) is greater than '{}' ({})",
                        min_keyword, lo, max_keyword, hi
                    ),
                );
            }
        }
    }
}

fn unknown_type_message(name: &str) -> String {
    format!(
        "'{}' is not a valid type; expected one of object, array, string, number, integer, boolean, null",
        name
    )
}
