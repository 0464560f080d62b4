//! Flag translation against the metatdenovo table.

use nf_params::{build_flags, metatdenovo, ExecutionRequest, ParamType, ParamValue};
use serde_json::{json, Map, Value};

fn payload(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object payload")
}

/// Minimal payload with every default cleared so only supplied values appear.
fn cleared(extra: Value) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, descriptor) in metatdenovo::schema().all() {
        if descriptor.default.is_some() {
            map.insert(name.to_string(), Value::Null);
        }
    }
    map.insert("outdir".to_string(), json!("latch:///results"));
    for (k, v) in payload(extra) {
        map.insert(k, v);
    }
    map
}

#[test]
fn test_single_end_run_flags() {
    let schema = metatdenovo::schema();
    let request = ExecutionRequest::resolve(
        schema,
        &cleared(json!({
            "input": "s3://x/samples.csv",
            "se_reads": true,
            "skip_fastqc": null,
            "bbnorm_target": 100,
        })),
    )
    .expect("resolve");

    let flags = build_flags(schema, &request);
    assert_eq!(
        flags,
        vec![
            "--input",
            "s3://x/samples.csv",
            "--se_reads",
            "--outdir",
            "latch:///results",
            "--bbnorm_target",
            "100",
        ]
    );
}

#[test]
fn test_order_independent_of_payload_order() {
    let schema = metatdenovo::schema();
    let a = ExecutionRequest::resolve(
        schema,
        &payload(json!({
            "input": "in.csv",
            "outdir": "out",
            "gff": "a.gff",
            "email": "me@example.com",
        })),
    )
    .unwrap();
    let b = ExecutionRequest::resolve(
        schema,
        &payload(json!({
            "email": "me@example.com",
            "gff": "a.gff",
            "outdir": "out",
            "input": "in.csv",
        })),
    )
    .unwrap();

    assert_eq!(build_flags(schema, &a), build_flags(schema, &b));
}

#[test]
fn test_defaults_reach_command_line() {
    let schema = metatdenovo::schema();
    let request = ExecutionRequest::resolve(
        schema,
        &payload(json!({"input": "in.csv", "outdir": "out"})),
    )
    .unwrap();
    let flags = build_flags(schema, &request);

    let joined = flags.join(" ");
    assert!(joined.contains("--bbnorm_target 100 --bbnorm_min 5"));
    assert!(joined.contains("--assembler megahit"));
    assert!(joined.contains("--min_contig_length 0"));
    // false-valued defaults produce no flag
    assert!(!flags.iter().any(|f| f == "--skip_eggnog"));
    assert!(!flags.iter().any(|f| f == "--skip_kofamscan"));
    assert!(!flags.iter().any(|f| f == "--skip_eukulele"));
}

#[test]
fn test_token_counts_per_type() {
    let schema = metatdenovo::schema();
    for (name, descriptor) in schema.all() {
        let value = match descriptor.param_type {
            ParamType::Bool => json!(true),
            ParamType::Int => json!(3),
            _ => json!("x"),
        };
        let mut supplied = cleared(json!({"input": "in.csv"}));
        supplied.insert(name.to_string(), value);

        let request = ExecutionRequest::resolve(schema, &supplied).unwrap();
        let tokens = nf_params::flag_tokens(name, request.get(name));
        let expected = if descriptor.param_type == ParamType::Bool { 1 } else { 2 };
        assert_eq!(tokens.len(), expected, "parameter {}", name);
        assert_eq!(tokens[0], format!("--{}", name));
    }

    assert_eq!(
        nf_params::flag_tokens("bbnorm", Some(&ParamValue::Bool(false))),
        Vec::<String>::new()
    );
}
