//! Integration tests for schema compilation and document validation.

use docweave::schema::{compile_text, SCHEMA_ERROR_PREFIX};
use docweave::{Engine, ErrorKind, Path, SchemaLike, Value};

const NOTE_SCHEMA: &str = "\
type: object
properties:
  title:
    type: string
    minLength: 1
  status:
    type: string
    enum: [draft, published]
  slug:
    type: string
    pattern: '^[a-z0-9-]+$'
  rating:
    type: integer
    minimum: 0
    maximum: 5
  tags:
    type: array
    items:
      type: string
    maxItems: 3
required: [title, status]
";

#[test]
fn test_valid_document_has_no_errors() {
    let engine = Engine::new();
    let doc = "title: Hello\nstatus: draft\nslug: hello-world\nrating: 4\ntags: [a, b]\n";
    let report = engine.validate(doc, NOTE_SCHEMA);
    assert!(report.is_success());
    assert!(report.errors().is_empty());
    assert_eq!(report.to_json(), r#"{"success":true,"errors":[]}"#);
}

#[test]
fn test_missing_required_field_names_its_path() {
    let report = Engine::new().validate("status: draft\n", NOTE_SCHEMA);
    assert!(!report.is_success());
    assert_eq!(report.errors().len(), 1);
    let error = &report.errors()[0];
    assert_eq!(error.code, ErrorKind::SchemaValidationError);
    assert_eq!(error.path, Path::from_field("title"));
    assert_eq!(error.message, "required field 'title' is missing");
}

#[test]
fn test_all_violations_are_reported() {
    let doc = "\
title: ''
status: archived
slug: Not A Slug
rating: 9
tags: [a, 2, c, d]
";
    let report = Engine::new().validate(doc, NOTE_SCHEMA);
    let found: Vec<(String, u32)> = report
        .errors()
        .iter()
        .map(|e| (e.path.to_string(), e.line))
        .collect();
    assert_eq!(
        found,
        vec![
            ("/title".to_string(), 1),
            ("/status".to_string(), 2),
            ("/slug".to_string(), 3),
            ("/rating".to_string(), 4),
            ("/tags".to_string(), 5),
            ("/tags/1".to_string(), 5),
        ]
    );
    assert!(report.has_code(ErrorKind::SchemaValidationError));
}

#[test]
fn test_error_details_describe_the_mismatch() {
    let report = Engine::new().validate("title: T\nstatus: draft\nrating: high\n", NOTE_SCHEMA);
    let error = &report.errors()[0];
    assert_eq!(error.path.dotted(), "rating");
    assert_eq!(error.expected.as_deref(), Some("integer"));
    assert_eq!(error.got.as_deref(), Some("string"));
    assert_eq!(error.line, 3);
}

#[test]
fn test_unparseable_document_yields_single_parse_error() {
    let report = Engine::new().validate("title: [unclosed\nstatus: 3\n", NOTE_SCHEMA);
    assert_eq!(report.errors().len(), 1);
    assert_eq!(report.errors()[0].code, ErrorKind::ParseError);
}

#[test]
fn test_invalid_schema_reports_compile_errors() {
    let report = Engine::new().validate("title: T\n", "type: object\nrequired: [title]\n");
    assert!(!report.is_success());
    assert!(report
        .errors()
        .iter()
        .all(|e| e.code == ErrorKind::SchemaCompileError));
}

#[test]
fn test_garbage_schema_never_panics() {
    let engine = Engine::new();
    for garbage in ["", "   \n", "{{{{", "- [", "42", "type: 7", "\u{feff}\t:::", "type: object\nproperties: [1]\n"] {
        let report = engine.compile_schema(garbage);
        assert!(!report.is_success(), "schema: {:?}", garbage);
        assert!(report
            .errors()
            .iter()
            .all(|e| e.code == ErrorKind::SchemaCompileError && e.message.starts_with(SCHEMA_ERROR_PREFIX)));
    }
}

#[test]
fn test_compile_errors_accumulate() {
    let schema = "type: object\nproperties:\n  a:\n    type: nope\n  b:\n    type: array\nrequired: [a, zzz]\nbogus: 1\n";
    let report = Engine::new().compile_schema(schema);
    assert!(report.errors().len() >= 4);
    assert!(report
        .errors()
        .iter()
        .any(|e| e.path == Path::from_field("bogus") && e.line == 8));
}

#[test]
fn test_compiled_schema_can_be_reused() {
    let schema = compile_text(NOTE_SCHEMA).into_result().unwrap();
    let doc = docweave::parse("title: T\nstatus: draft\n").unwrap();
    assert!(schema.validate(&doc).is_success());
    assert!(schema.validate(&Value::Null).is_failure());
    assert!(schema.root().validate(&doc, &Path::root()).is_success());
}

#[test]
fn test_engine_caches_compilations() {
    let engine = Engine::new();
    assert!(engine.schema_cache().is_empty());
    engine.validate("title: T\nstatus: draft\n", NOTE_SCHEMA);
    engine.validate("title: U\nstatus: published\n", NOTE_SCHEMA);
    assert_eq!(engine.schema_cache().len(), 1);
    assert!(engine.schema_cache().contains(NOTE_SCHEMA));
}
