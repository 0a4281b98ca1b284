//! Integration tests for parsing and serializing document text.

use docweave::syntax::Parser;
use docweave::{parse, serialize, Engine, EngineConfig, ErrorKind, Mapping, Value};

fn round_trip(text: &str) {
    let parsed = parse(text).unwrap();
    let reparsed = parse(&serialize(&parsed)).unwrap();
    assert_eq!(reparsed, parsed, "text: {:?}", text);
}

#[test]
fn test_round_trip_preserves_trees() {
    let samples = [
        "title: Hello\ncount: 3\nratio: 0.25\ndraft: false\nnote: null\n",
        "meta:\n  author: Ann\n  tags: [a, b]\nlist:\n  - 1\n  - {x: 1, y: [true, ~]}\n",
        "quoted: 'true'\nnumeric: '0x1F'\nempty: ''\nhash: 'a # b'\ncolon: 'k: v'\n",
        "text: |\n  first line\n  second line\nfolded: >\n  one\n  two\n",
        "- - 1\n  - 2\n- []\n- {}\n",
        "unicode: \"caf\\u00e9 \\t tab\"\nbig: 12345678901234\nneg: -7\nexp: 1.5e3\n",
        "nested:\n  - heading: One\n    items:\n      - deep: [1, [2, [3]]]\n",
        "",
        "just a scalar",
        "nan: .nan\ninf: -.inf\nwhole: 2.0\n",
    ];
    for sample in samples {
        round_trip(sample);
    }
}

#[test]
fn test_key_order_is_preserved() {
    let value = parse("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
    let keys: Vec<&str> = value
        .as_mapping()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    assert_eq!(serialize(&value), "zeta: 1\nalpha: 2\nmid: 3\n");
}

#[test]
fn test_scalar_type_inference() {
    let value = parse("i: 42\nf: 4.5\nb: true\nn: ~\ns: hello world\nq: \"42\"\n").unwrap();
    assert_eq!(value.get("i").map(Value::type_name), Some("integer"));
    assert_eq!(value.get("f").map(Value::type_name), Some("number"));
    assert_eq!(value.get("b"), Some(&Value::Bool(true)));
    assert_eq!(value.get("n"), Some(&Value::Null));
    assert_eq!(value.get("s"), Some(&Value::from("hello world")));
    assert_eq!(value.get("q"), Some(&Value::from("42")));
}

#[test]
fn test_parse_error_carries_position() {
    let err = parse("title: ok\nlist: [1, 2\n").unwrap_err();
    assert!(err.position().line >= 2);

    let engine = Engine::new();
    let err = engine.parse("a: 1\n  b: 2\n").unwrap_err();
    assert_eq!(err.code, ErrorKind::ParseError);
    assert_eq!(err.line, 2);
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let err = Engine::new().parse("a: 1\nb: 2\na: 3\n").unwrap_err();
    assert_eq!(err.code, ErrorKind::ParseError);
    assert_eq!(err.line, 3);
    assert!(err.message.contains('a'));
}

#[test]
fn test_depth_limit() {
    let text = "a:\n  b:\n    c:\n      d: 1\n";
    assert!(Parser::new(text).with_max_depth(4).parse().is_ok());
    assert!(Parser::new(text).with_max_depth(3).parse().is_err());

    let engine = Engine::with_config(EngineConfig::new().with_max_depth(2));
    assert!(engine.parse(text).is_err());
    assert!(engine.parse("a:\n  b: 1\n").is_ok());
}

#[test]
fn test_serialized_layout() {
    let mut inner = Mapping::new();
    inner.insert("b".to_string(), Value::from(1i64));
    let mut outer = Mapping::new();
    outer.insert("a".to_string(), Value::Mapping(inner));
    let value = Value::Mapping(outer);

    assert_eq!(serialize(&value), "a:\n  b: 1\n");
    assert_eq!(parse("a:\n    b: 1\n").unwrap(), value);
    assert_eq!(serialize(&parse("tags: [x, 'y']\n").unwrap()), "tags:\n- x\n- y\n");
}

#[test]
fn test_source_map_records_lines() {
    let engine = Engine::new();
    let (_, source_map) = engine
        .parse_with_source_map("title: T\nmeta:\n  author: A\ntags:\n  - x\n  - y\n")
        .unwrap();
    let at = |pointer: &str| {
        source_map
            .get(&docweave::Path::parse_pointer(pointer).unwrap())
            .map(|p| p.line)
    };
    assert_eq!(at("/title"), Some(1));
    assert_eq!(at("/meta/author"), Some(3));
    assert_eq!(at("/tags/1"), Some(6));
}

#[test]
fn test_nan_survives_round_trip() {
    let parsed = parse("a: .nan\n").unwrap();
    assert_eq!(parse(&serialize(&parsed)).unwrap(), parsed);
    assert_eq!(parsed, parse("a: .NaN\n").unwrap());
}
