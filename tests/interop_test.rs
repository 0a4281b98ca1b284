//! Integration tests for the text-in, text-out surface.

use docweave::{ConflictReport, Engine, EngineConfig, TextApi, ToEnvelope, ValidationResult};
use serde_json::{json, Value as Json};

fn json(text: &str) -> Json {
    serde_json::from_str(text).unwrap()
}

/// Every response is either a success payload or the uniform failure shape.
fn assert_failure_shape(response: &str) {
    let value = json(response);
    assert_eq!(value["success"], json!(false));
    let errors = value["errors"].as_array().unwrap();
    assert!(!errors.is_empty());
    for error in errors {
        assert!(error["line"].is_u64());
        assert!(error["message"].is_string());
        assert!(error["path"].is_string());
        assert!(error["code"].is_string());
    }
}

#[test]
fn test_parse_envelope() {
    let api = TextApi::new();
    assert_eq!(
        json(&api.parse("title: T\ntags: [a, 2]\n")),
        json!({"success": true, "content": {"title": "T", "tags": ["a", 2]}})
    );
    assert_failure_shape(&api.parse("title: {\n"));
}

#[test]
fn test_serialize_from_tree_json() {
    let api = TextApi::new();
    assert_eq!(api.serialize(r#"{"title":"T","n":[1,true,null]}"#), "title: T\nn:\n- 1\n- true\n- null\n");
    assert_failure_shape(&api.serialize("not json"));
}

#[test]
fn test_validation_envelopes() {
    let api = TextApi::new();
    let schema = "type: object\nproperties:\n  title:\n    type: string\nrequired: [title]\n";

    assert_eq!(api.validate("title: T\n", schema), r#"{"success":true,"errors":[]}"#);

    let report = json(&api.validate("other: 1\n", schema));
    assert_eq!(report["errors"][0]["path"], json!("/title"));
    assert_eq!(report["errors"][0]["code"], json!("SchemaValidationError"));
    assert_failure_shape(&api.validate("other: 1\n", schema));

    assert_eq!(api.compile_schema(schema), r#"{"success":true,"errors":[]}"#);
    assert_failure_shape(&api.compile_schema("garbage"));

    assert_eq!(
        api.parse_and_validate_frontmatter("---\nschema_path: ./s.yaml\nvalidated: true\n---\n# T"),
        r#"{"success":true,"errors":[]}"#
    );
    let report = json(&api.parse_and_validate_frontmatter("---\nvalidated: invalid_value\n---\n# T"));
    assert_eq!(report["errors"][0]["code"], json!("FrontmatterValidationError"));
}

#[test]
fn test_tree_conversion_round_trip() {
    let api = TextApi::new();
    let tree = api.structured_to_tree("# Doc\n## S1\nbody1\n## S2\nbody2");
    assert_eq!(
        json(&tree),
        json!({
            "title": "Doc",
            "sections": [
                {"heading": "S1", "content": "body1"},
                {"heading": "S2", "content": "body2"}
            ]
        })
    );
    let text = api.tree_to_structured(&tree);
    assert_eq!(api.structured_to_tree(&text), tree);
    assert_failure_shape(&api.tree_to_structured("{"));
}

#[test]
fn test_diff_and_apply_over_text() {
    let api = TextApi::new();
    let base = "title: A\ncontent: X";
    let edited = "title: B\ncontent: X";
    let patch = api.diff(base, edited);
    assert_eq!(json(&patch), json!([{"op": "replace", "path": "/title", "value": "B"}]));
    assert_eq!(api.apply_patch(base, &patch), "title: B\ncontent: X\n");

    assert_eq!(api.diff("a: [\n", edited), "[]");
    assert_eq!(api.apply_patch(base, "{\"op\":\"add\"}"), base);
}

#[test]
fn test_conflict_envelope() {
    let api = TextApi::new();
    assert_eq!(
        json(&api.detect_conflicts("title: A\n", "title: B\n")),
        json!({"hasConflict": true, "conflicts": [{"path": "/title", "value": "B"}]})
    );
    assert_eq!(
        ConflictReport::none().to_envelope(),
        r#"{"hasConflict":false,"conflicts":[]}"#
    );
}

#[test]
fn test_api_uses_engine_config() {
    let api = TextApi::with_engine(Engine::with_config(
        EngineConfig::new()
            .with_max_depth(4)
            .with_allow_missing_frontmatter(true),
    ));
    assert_eq!(api.serialize(r#"{"a":{"b":1}}"#), "a:\n  b: 1\n");
    assert_failure_shape(&api.parse("a: [[[[[1]]]]]\n"));
    assert_eq!(api.parse_and_validate_frontmatter("# T\n"), ValidationResult::success().to_envelope());
    assert_eq!(api.version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(api.engine().config().max_depth, 4);
}
