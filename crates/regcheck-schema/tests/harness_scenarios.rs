//! End-to-end harness scenarios over on-disk spec trees.
//!
//! Each test lays out a `spec/` directory in a temp dir with a
//! `registry.json`, schema groups (`<group>/schemas/*.json`), examples
//! (`<group>/examples`) and invalid cases (`<group>/tests/invalid`), then
//! runs the full pipeline.

use std::cell::Cell;
use std::path::Path;

use regcheck_core::{ExitStatus, SchemaId, Violation};
use regcheck_schema::{
    EngineError, FsLoader, Harness, HarnessConfig, HarnessError, JsonSchemaEngine,
    ResolutionUniverse, ValidationEngine,
};
use serde_json::{json, Value};

fn write_json(root: &Path, rel: &str, value: &Value) {
    write_raw(root, rel, &serde_json::to_string_pretty(value).unwrap());
}

fn write_raw(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Counts engine invocations and delegates to the real engine.
#[derive(Default)]
struct CountingEngine {
    calls: Cell<usize>,
    inner: JsonSchemaEngine,
}

impl ValidationEngine for CountingEngine {
    fn validate(
        &self,
        schema_id: &SchemaId,
        universe: &ResolutionUniverse,
        document: &Value,
    ) -> Result<Vec<Violation>, EngineError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.validate(schema_id, universe, document)
    }
}

/// Accepts everything, including documents that should be rejected.
struct PermissiveEngine;

impl ValidationEngine for PermissiveEngine {
    fn validate(
        &self,
        _schema_id: &SchemaId,
        _universe: &ResolutionUniverse,
        _document: &Value,
    ) -> Result<Vec<Violation>, EngineError> {
        Ok(Vec::new())
    }
}

fn order_tree(spec: &Path) {
    write_json(
        spec,
        "registry.json",
        &json!({"schemas": [
            {"id": "https://example.org/order.json", "path": "order/schemas/order.schema.json"},
            {"id": "https://example.org/line.json", "path": "line/schemas/line.schema.json"}
        ]}),
    );
    write_json(
        spec,
        "order/schemas/order.schema.json",
        &json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$id": "https://example.org/order.json",
            "type": "object",
            "required": ["sku", "lines"],
            "additionalProperties": false,
            "properties": {
                "sku": {"type": "string"},
                "lines": {"type": "array", "items": {"$ref": "https://example.org/line.json#"}}
            }
        }),
    );
    write_json(
        spec,
        "line/schemas/line.schema.json",
        &json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$id": "https://example.org/line.json",
            "type": "object",
            "required": ["qty"],
            "properties": {"qty": {"type": "integer", "minimum": 1}}
        }),
    );
    write_json(spec, "order/examples/basic.json", &json!({"sku": "A-1", "lines": [{"qty": 1}]}));
    write_json(spec, "order/examples/bulk/many.json", &json!({"sku": "B-2", "lines": [{"qty": 5}, {"qty": 9}]}));
    write_json(spec, "order/tests/invalid/zero-qty.json", &json!({"sku": "C-3", "lines": [{"qty": 0}]}));
    write_json(spec, "order/tests/invalid/extra.json", &json!({"sku": "C-3", "lines": [], "x": 1}));
}

#[test]
fn unresolved_reference_aborts_before_validation() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    write_json(spec, "registry.json", &json!({"schemas": [{"id": "A", "path": "a.json"}]}));
    write_json(spec, "a.json", &json!({"properties": {"b": {"$ref": "B"}}}));
    write_json(spec, "examples/one.json", &json!({}));

    let config = HarnessConfig::default();
    let engine = CountingEngine::default();
    let err = Harness::new(spec, &config, &engine, &FsLoader).run().unwrap_err();

    match &err {
        HarnessError::Closure(closure) => {
            let ids: Vec<&str> = closure.unresolved().iter().map(SchemaId::as_str).collect();
            assert_eq!(ids, vec!["B"]);
        }
        other => panic!("expected closure error, got {other}"),
    }
    assert_eq!(err.exit_status().code(), 2);
    assert_eq!(engine.calls.get(), 0, "closure checking must not invoke the engine");
}

#[test]
fn duplicate_ids_abort_before_validation() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    write_json(
        spec,
        "registry.json",
        &json!({"schemas": [{"id": "A", "path": "a.json"}, {"id": "A", "path": "a.json"}]}),
    );
    write_json(spec, "a.json", &json!({}));

    let config = HarnessConfig::default();
    let engine = CountingEngine::default();
    let err = Harness::new(spec, &config, &engine, &FsLoader).run().unwrap_err();
    assert!(matches!(err, HarnessError::Manifest(_)));
    assert_eq!(err.exit_status(), ExitStatus::ConfigurationError);
    assert_eq!(engine.calls.get(), 0);
}

#[test]
fn missing_registry_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = HarnessConfig::default();
    let err = Harness::new(dir.path(), &config, JsonSchemaEngine::new(), &FsLoader)
        .run()
        .unwrap_err();
    assert!(err.to_string().contains("registry.json"));
    assert_eq!(err.exit_status().code(), 2);
}

#[test]
fn single_valid_example_passes() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    write_json(spec, "registry.json", &json!({"schemas": [{"id": "A", "path": "a/schemas/a.json"}]}));
    write_json(spec, "a/schemas/a.json", &json!({"type": "object", "required": ["name"]}));
    write_json(spec, "a/examples/ok.json", &json!({"name": "x"}));

    let config = HarnessConfig::default();
    let report = Harness::new(spec, &config, JsonSchemaEngine::new(), &FsLoader).run().unwrap();
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.failed, 0);
    assert_eq!(report.exit_status().code(), 0);
    assert_eq!(
        report.render_text(10),
        "✅ a/examples/ok.json\n\nSummary: 1 example(s) validated, 0 failed.\n"
    );
}

#[test]
fn invalid_case_accepted_by_engine_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    write_json(spec, "registry.json", &json!({"schemas": [{"id": "A", "path": "a/schemas/a.json"}]}));
    write_json(spec, "a/schemas/a.json", &json!({"type": "object"}));
    write_json(spec, "a/tests/invalid/should-fail.json", &json!({"anything": true}));

    let config = HarnessConfig::default();
    let report = Harness::new(spec, &config, PermissiveEngine, &FsLoader).run().unwrap();
    assert_eq!(report.summary.total, 1);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.exit_status().code(), 1);
    assert!(report
        .render_text(10)
        .contains("❌ (should fail but passed) a/tests/invalid/should-fail.json"));
}

#[test]
fn cross_schema_corpus_validates_offline() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    order_tree(spec);

    let config = HarnessConfig::default();
    let report = Harness::new(spec, &config, JsonSchemaEngine::new(), &FsLoader).run().unwrap();

    assert_eq!(report.summary.total, 4, "{}", report.render_text(10));
    assert_eq!(report.summary.failed, 0, "{}", report.render_text(10));
    let text = report.render_text(10);
    assert!(text.contains("✅ order/examples/basic.json"));
    assert!(text.contains("✅ (expected fail) order/tests/invalid/zero-qty.json"));
    assert!(text.contains("(Info) No examples found under: line/examples"));
}

#[test]
fn failing_example_names_file_location_and_message() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    order_tree(spec);
    write_json(spec, "order/examples/wrong.json", &json!({"sku": 7, "lines": [{"qty": 1}, {}]}));

    let config = HarnessConfig::default();
    let report = Harness::new(spec, &config, JsonSchemaEngine::new(), &FsLoader).run().unwrap();
    assert_eq!(report.summary.failed, 1);

    let text = report.render_text(10);
    assert!(text.contains("❌ order/examples/wrong.json (schema: order/schemas/order.schema.json)"));
    let lines: Vec<&str> = text.lines().filter(|l| l.starts_with("   - ")).collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("   - $.lines[1]: "), "{}", lines[0]);
    assert!(lines[1].starts_with("   - $.sku: "), "{}", lines[1]);
}

#[test]
fn malformed_example_does_not_abort_other_schemas() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    order_tree(spec);
    write_raw(spec, "order/examples/aaa-broken.json", "{ \"sku\": ");
    write_json(spec, "line/examples/ok.json", &json!({"qty": 3}));

    let config = HarnessConfig::default();
    let report = Harness::new(spec, &config, JsonSchemaEngine::new(), &FsLoader).run().unwrap();
    assert_eq!(report.summary.total, 6);
    assert_eq!(report.summary.failed, 1);
    assert!(report.render_text(10).contains("❌ (malformed) order/examples/aaa-broken.json"));
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    order_tree(spec);
    write_json(spec, "order/examples/wrong.json", &json!({"lines": [{"qty": -1}, {"qty": "x"}]}));

    let config = HarnessConfig::default();
    let first = Harness::new(spec, &config, JsonSchemaEngine::new(), &FsLoader).run().unwrap();
    let second = Harness::new(spec, &config, JsonSchemaEngine::new(), &FsLoader).run().unwrap();
    assert_eq!(first.render_text(10), second.render_text(10));
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.summary, second.summary);
}

#[test]
fn yaml_registry_and_custom_layout() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    write_raw(spec, "registry.yaml", "schemas:\n  - id: A\n    path: a/schemas/a.json\n");
    write_json(spec, "a/schemas/a.json", &json!({"type": "string"}));
    write_json(spec, "a/samples/s.json", &json!("ok"));
    write_json(spec, "a/rejects/r.json", &json!(1));

    let config = HarnessConfig::from_yaml_str(
        "registry: registry.yaml\nexamples_dir: samples\ninvalid_dir: rejects\n",
    )
    .unwrap();
    let report = Harness::new(spec, &config, JsonSchemaEngine::new(), &FsLoader).run().unwrap();
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.failed, 0);
}

#[test]
fn each_schema_compiles_once_per_run() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path();
    order_tree(spec);
    write_json(spec, "line/examples/ok.json", &json!({"qty": 3}));

    let config = HarnessConfig::default();
    let engine = JsonSchemaEngine::new();
    let report = Harness::new(spec, &config, &engine, &FsLoader).run().unwrap();
    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.failed, 0, "{}", report.render_text(10));
    assert_eq!(engine.cached(), 2);
}
