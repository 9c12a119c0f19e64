
use serde_json::json;
use test_support::{load_rows, record, request, spawn_sidecar};

#[test]
fn load_rejects_rows_missing_required_columns() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "records.load",
        json!({
            "rows": [{
                "real_name": "张小明",
                "level_sequence": 1,
                "unit_sequence": 1
            }]
        }),
    );
    assert_eq!(resp["ok"], false);
    assert_eq!(resp["error"]["code"], "missing_fields");
    let missing = resp["error"]["details"]["missing"]
        .as_array()
        .expect("missing list");
    assert!(missing.contains(&json!("unit_finish_status")));
    assert!(missing.contains(&json!("answer_right_rate")));
    assert!(missing.contains(&json!("first_cost_seconds")));
    assert!(!missing.contains(&json!("real_name")));
}

#[test]
fn load_rejects_empty_and_malformed_payloads() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(&mut stdin, &mut reader, "1", "records.load", json!({}));
    assert_eq!(resp["error"]["code"], "bad_params");

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "records.load",
        json!({ "rows": [] }),
    );
    assert_eq!(resp["error"]["code"], "empty_rows");

    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "records.load",
        json!({ "rows": ["not an object"] }),
    );
    assert_eq!(resp["error"]["code"], "bad_params");
}

#[test]
fn reload_replaces_the_dataset() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let first = load_rows(
        &mut stdin,
        &mut reader,
        "1",
        vec![record("张小明", 1, 1, "完课", json!(0.8), json!(100))],
    );
    let second = load_rows(
        &mut stdin,
        &mut reader,
        "2",
        vec![
            record("李雷", 1, 1, "完课", json!(0.8), json!(100)),
            record("韩梅梅", 1, 1, "", json!(0.6), json!(100)),
        ],
    );
    assert_ne!(first["datasetId"], second["datasetId"]);
    assert_eq!(second["studentCount"], 2);

    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "report.generate",
        json!({ "student": "张小明", "role": "counselor" }),
    );
    assert_eq!(resp["ok"], false, "first dataset is gone after reload");
    assert_eq!(resp["error"]["code"], "not_found");
}

#[test]
fn generate_validates_params_before_the_engine_runs() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_rows(
        &mut stdin,
        &mut reader,
        "1",
        vec![record("张小明", 1, 1, "完课", json!(0.8), json!(100))],
    );

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "report.generate",
        json!({ "student": "张小明", "role": "principal" }),
    );
    assert_eq!(resp["error"]["code"], "bad_params");

    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "report.generate",
        json!({ "student": "张小明", "role": "counselor", "unitRange": { "min": 3, "max": 1 } }),
    );
    assert_eq!(resp["error"]["code"], "bad_params");

    let resp = request(
        &mut stdin,
        &mut reader,
        "4",
        "report.generate",
        json!({ "role": "counselor" }),
    );
    assert_eq!(resp["error"]["code"], "bad_params");
}
