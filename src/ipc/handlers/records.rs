use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Dataset, Request};
use crate::labels;
use crate::model::RawRecord;

/// Columns every export must carry. Checked once against the first row;
/// cell-level absence in later rows is normalized away instead.
const REQUIRED_COLUMNS: [&str; 6] = [
    "real_name",
    "level_sequence",
    "unit_sequence",
    "unit_finish_status",
    "answer_right_rate",
    "first_cost_seconds",
];

fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

fn dataset<'a>(state: &'a AppState, req: &Request) -> Result<&'a Dataset, serde_json::Value> {
    state
        .dataset
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_dataset", "load records first", None))
}

fn handle_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(raw_rows) = req.params.get("rows").and_then(|v| v.as_array()) else {
        return err(&req.id, "bad_params", "missing params.rows", None);
    };
    if raw_rows.is_empty() {
        return err(&req.id, "empty_rows", "文件为空", None);
    }

    let Some(first) = raw_rows[0].as_object() else {
        return err(&req.id, "bad_params", "rows must contain objects", None);
    };
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !first.contains_key(**c))
        .copied()
        .collect();
    if !missing.is_empty() {
        return err(
            &req.id,
            "missing_fields",
            format!("缺少必要字段: {}", missing.join(", ")),
            Some(json!({ "missing": missing })),
        );
    }

    let mut rows: Vec<RawRecord> = Vec::with_capacity(raw_rows.len());
    for (i, raw) in raw_rows.iter().enumerate() {
        match serde_json::from_value::<RawRecord>(raw.clone()) {
            Ok(row) => rows.push(row),
            Err(e) => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("rows[{}] is not a valid record: {}", i, e),
                    None,
                )
            }
        }
    }

    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    for r in &rows {
        seen.insert(r.real_name.as_str());
    }
    let student_count = seen.len();

    let dataset = Dataset {
        id: Uuid::new_v4().to_string(),
        loaded_at: Utc::now(),
        rows,
    };
    let result = json!({
        "datasetId": dataset.id,
        "rowCount": dataset.rows.len(),
        "studentCount": student_count,
        "loadedAt": dataset.loaded_at.to_rfc3339(),
    });
    state.dataset = Some(dataset);
    ok(&req.id, result)
}

/// Roster summary, one entry per student in first-appearance order.
fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let dataset = match dataset(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    struct Summary {
        name: String,
        grade: String,
        teacher: String,
        row_count: usize,
        last_unit: i64,
    }

    let mut order: Vec<Summary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for r in &dataset.rows {
        let slot = *index.entry(r.real_name.clone()).or_insert_with(|| {
            order.push(Summary {
                name: r.real_name.clone(),
                grade: labels::translate_grade(&r.package_grade),
                teacher: if r.counselor_name.is_empty() {
                    labels::DEFAULT_TEACHER.to_string()
                } else {
                    r.counselor_name.clone()
                },
                row_count: 0,
                last_unit: 0,
            });
            order.len() - 1
        });
        let s = &mut order[slot];
        s.row_count += 1;
        if let Some(unit) = r.unit() {
            s.last_unit = s.last_unit.max(unit);
        }
    }

    let students: Vec<serde_json::Value> = order
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "grade": s.grade,
                "teacher": s.teacher,
                "rowCount": s.row_count,
                "lastUnit": s.last_unit,
            })
        })
        .collect();
    ok(&req.id, json!({ "students": students }))
}

/// Sorted distinct unit numbers for one student; feeds the range picker.
fn handle_units_available(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student = match required_str(req, "student") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let dataset = match dataset(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let mut units: Vec<i64> = dataset
        .rows
        .iter()
        .filter(|r| r.real_name == student)
        .filter_map(|r| r.unit())
        .collect();
    units.sort_unstable();
    units.dedup();
    ok(&req.id, json!({ "units": units }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "records.load" => Some(handle_load(state, req)),
        "students.list" => Some(handle_students_list(state, req)),
        "units.available" => Some(handle_units_available(state, req)),
        _ => None,
    }
}
