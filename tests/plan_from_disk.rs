//! Carga de documentos desde disco y generación del plan de parámetros.

use std::io::Write;

use mergeflow_rust::config::DocumentFormat;
use mergeflow_rust::loader::{load_configuration_as, parse_document};
use mergeflow_rust::plan::{build_plan, context_reader, select_slice, PlanOptions};
use mergeflow_rust::AppError;
use merge_config::ModelReference;
use merge_core::ScalarValue;

const SLERP_YAML: &str = r#"
merge_method: slerp
base_model: org/model-a
slices:
  - sources:
      - model: org/model-a
        layer_range: [0, 4]
      - model: org/model-b
        layer_range: [0, 4]
        parameters:
          t: 0.9
    parameters:
      t:
        - filter: self_attn
          value: [0.0, 1.0]
        - value: 0.5
  - sources:
      - model: org/model-a
        layer_range: [5, 5]
      - model: org/model-b
        layer_range: [5, 5]
parameters:
  t: 0.2
"#;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

fn options(tensor: &str) -> PlanOptions {
    PlanOptions { parameter: "t".into(),
                  tensor_template: tensor.into(),
                  t: 0.0,
                  threads: 2 }
}

#[test]
fn load_yaml_by_extension() {
    let file = write_temp(".yaml", SLERP_YAML);
    let cfg = load_configuration_as(file.path(), DocumentFormat::Json).expect("yaml by extension");
    cfg.validate().expect("valid");
    assert_eq!(cfg.output_slices().len(), 2);
}

#[test]
fn load_json_without_extension_uses_fallback() {
    let file = write_temp("", r#"{"merge_method": "linear", "models": [{"model": "a"}], "parameters": {"weight": 1}}"#);
    let cfg = load_configuration_as(file.path(), DocumentFormat::Json).expect("json fallback");
    assert_eq!(cfg.input_models().len(), 1);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_configuration_as(std::path::Path::new("/nonexistent/merge.yaml"), DocumentFormat::Yaml).unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn plan_resolves_every_layer_of_every_source() {
    let cfg = parse_document(SLERP_YAML, DocumentFormat::Yaml).expect("valid yaml");
    let plan = build_plan(&cfg, &options("model.layers.{layer}.self_attn.q_proj.weight")).expect("plan");
    // 5 capas x 2 fuentes + 1 capa x 2 fuentes
    assert_eq!(plan.rows.len(), 12);
    assert_eq!(plan.fingerprint, cfg.fingerprint().unwrap());

    let first = &plan.rows[0];
    assert_eq!(first.model, "org/model-a");
    assert_eq!(first.tensor, "model.layers.0.self_attn.q_proj.weight");
    assert_eq!(first.scope, Some("output_slice"));
    assert_eq!(first.value, Some(ScalarValue::Number(0.0)));

    let mid = &plan.rows[2];
    assert_eq!(mid.t, 0.5);
    assert_eq!(mid.value, Some(ScalarValue::Number(0.5)));

    let source_override = &plan.rows[5];
    assert_eq!(source_override.model, "org/model-b");
    assert_eq!(source_override.scope, Some("source_slice"));
    assert_eq!(source_override.value, Some(ScalarValue::Number(0.9)));

    let tail = &plan.rows[10];
    assert_eq!(tail.slice, Some(1));
    assert_eq!(tail.output_layer, Some(5));
    assert_eq!(tail.source_layer, Some(5));
    assert_eq!(tail.scope, Some("global"));
    assert_eq!(tail.value, Some(ScalarValue::Number(0.2)));
}

#[test]
fn plan_marks_undeclared_parameters() {
    let cfg = parse_document(SLERP_YAML, DocumentFormat::Yaml).expect("valid yaml");
    let mut opts = options("model.norm.weight");
    opts.parameter = "density".into();
    let plan = build_plan(&cfg, &opts).expect("plan");
    assert!(plan.rows.iter().all(|r| r.scope.is_none() && r.value.is_none()));
}

#[test]
fn plan_rejects_invalid_configuration() {
    let cfg = parse_document("merge_method: linear\n", DocumentFormat::Yaml).expect("parses");
    let err = build_plan(&cfg, &options("x")).unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn plan_in_model_mode_uses_given_position() {
    let raw = "merge_method: linear\nmodels:\n  - model: a\n    parameters:\n      weight: [0, 1]\n  - model: b\n";
    let cfg = parse_document(raw, DocumentFormat::Yaml).expect("valid yaml");
    let mut opts = options("lm_head.weight");
    opts.parameter = "weight".into();
    opts.t = 0.75;
    opts.threads = 0;
    let plan = build_plan(&cfg, &opts).expect("plan");
    assert_eq!(plan.rows.len(), 2);
    assert_eq!(plan.rows[0].slice, None);
    assert_eq!(plan.rows[0].scope, Some("source_slice"));
    assert_eq!(plan.rows[0].value, Some(ScalarValue::Number(0.75)));
    assert_eq!(plan.rows[1].model, "b");
    assert_eq!(plan.rows[1].value, None);
}

#[test]
fn resolve_and_plan_agree_in_model_mode() {
    let raw = "merge_method: linear\nmodels:\n  - model: a\n    parameters:\n      weight: 0.4\n  - model: b\nparameters:\n  weight: 0.1\n";
    let cfg = parse_document(raw, DocumentFormat::Yaml).expect("valid yaml");
    let mut opts = options("lm_head.weight");
    opts.parameter = "weight".into();
    let plan = build_plan(&cfg, &opts).expect("plan");

    let model_sources = cfg.model_sources();
    let slice = select_slice(&cfg, None).expect("no slice requested");
    let reader = context_reader(&cfg, slice, &model_sources, "lm_head.weight", 0.0);
    for row in &plan.rows {
        let model = ModelReference::parse(&row.model).expect("model reference");
        assert_eq!(reader.declaring_scope("weight", Some(&model)), row.scope);
        assert_eq!(reader.parameter("weight", Some(&model), None, false).unwrap(), row.value);
    }
    assert_eq!(plan.rows[0].scope, Some("source_slice"));
    assert_eq!(plan.rows[0].value, Some(ScalarValue::Number(0.4)));
    assert_eq!(plan.rows[1].scope, Some("global"));
    assert_eq!(plan.rows[1].value, Some(ScalarValue::Number(0.1)));
}

#[test]
fn plan_rejects_sources_with_different_spans() {
    let raw = "merge_method: slerp\nslices:\n  - sources:\n      - model: a\n        layer_range: [0, 3]\n      - model: b\n        layer_range: [0, 1]\n";
    let cfg = parse_document(raw, DocumentFormat::Yaml).expect("parses");
    let err = build_plan(&cfg, &options("model.layers.{layer}.mlp.weight")).unwrap_err();
    assert_eq!(err.exit_code(), 4);
}
