//! Tests for sharing one engine between threads.

use docweave::{Engine, EngineConfig, ErrorKind, TextApi};
use std::sync::Arc;
use std::thread;

const SCHEMA: &str = "\
type: object
properties:
  title:
    type: string
  count:
    type: integer
    minimum: 0
required: [title]
";

#[test]
fn test_concurrent_validation() {
    let engine = Arc::new(Engine::new());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let doc = format!("title: Doc{}\ncount: {}\n", i, i);
                assert!(engine.validate(&doc, SCHEMA).is_success());

                let report = engine.validate("count: -1\n", SCHEMA);
                assert_eq!(report.errors().len(), 2);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(engine.schema_cache().len(), 1);
}

#[test]
fn test_concurrent_schema_compilation_with_eviction() {
    let engine = Arc::new(Engine::with_config(
        EngineConfig::new().with_schema_cache_capacity(4),
    ));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let schema = format!("type: string\nmaxLength: {}\n", i + 1);
                for _ in 0..5 {
                    assert!(engine.compile_schema(&schema).is_success());
                }
                let broken = format!("type: string\nmaxLength: -{}\n", i + 1);
                assert!(engine
                    .compile_schema(&broken)
                    .has_code(ErrorKind::SchemaCompileError));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(engine.schema_cache().len() <= 4);
}

#[test]
fn test_cloned_engines_share_the_cache() {
    let engine = Engine::new();
    let clone = engine.clone();

    let handle = thread::spawn(move || {
        assert!(clone.compile_schema(SCHEMA).is_success());
    });
    handle.join().unwrap();

    assert!(engine.schema_cache().contains(SCHEMA));
}

#[test]
fn test_concurrent_diff_and_patch() {
    let api = Arc::new(TextApi::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                let base = "title: A\nitems: [1, 2, 3]\n";
                let edited = format!("title: T{}\nitems: [1, {}]\n", i, i);
                let patch = api.diff(base, &edited);
                let patched = api.apply_patch(base, &patch);
                assert_eq!(api.parse(&patched), api.parse(&edited));
                assert!(!api.detect_conflicts(base, &edited).contains("\"hasConflict\":false"));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
