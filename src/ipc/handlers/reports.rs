use serde_json::json;

use crate::aggregate;
use crate::display::{self, DisplayConfig};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Dataset, Request};
use crate::model::{Role, UnitRange};
use crate::normalize;

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

pub fn parse_role(req: &Request) -> Result<Role, serde_json::Value> {
    let Some(raw) = req.params.get("role") else {
        return Err(err(&req.id, "bad_params", "missing role", None));
    };
    serde_json::from_value::<Role>(raw.clone()).map_err(|_| {
        err(
            &req.id,
            "bad_params",
            "role must be one of: counselor, headteacher",
            None,
        )
    })
}

pub fn parse_unit_range(req: &Request) -> Result<Option<UnitRange>, serde_json::Value> {
    match req.params.get("unitRange") {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => {
            let range: UnitRange = serde_json::from_value(v.clone()).map_err(|_| {
                err(
                    &req.id,
                    "bad_params",
                    "unitRange must be an object with integer min and max",
                    None,
                )
            })?;
            if range.min > range.max {
                return Err(err(
                    &req.id,
                    "bad_params",
                    "unitRange.min must be <= unitRange.max",
                    None,
                ));
            }
            Ok(Some(range))
        }
    }
}

fn parse_display(req: &Request) -> Result<DisplayConfig, serde_json::Value> {
    match req.params.get("display") {
        None => Ok(DisplayConfig::default()),
        Some(v) if v.is_null() => Ok(DisplayConfig::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            err(
                &req.id,
                "bad_params",
                format!("display config is invalid: {}", e),
                None,
            )
        }),
    }
}

fn handle_generate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student = match required_str(req, "student") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let role = match parse_role(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let range = match parse_unit_range(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let display_cfg = match parse_display(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let dataset = match dataset(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let Some(report) = aggregate::aggregate(&dataset.rows, &student, role, range) else {
        return err(
            &req.id,
            "not_found",
            format!("no records for student: {}", student),
            None,
        );
    };

    let units_display = display::resolve_units(&report.units, &display_cfg);
    let avg_seconds = report.avg_time_per_session.round() as i64;
    ok(
        &req.id,
        json!({
            "report": serde_json::to_value(&report).unwrap_or(serde_json::Value::Null),
            "display": {
                "units": serde_json::to_value(&units_display).unwrap_or(serde_json::Value::Null),
                "totalTimeLabel": normalize::format_duration(report.total_time_seconds),
                "avgTimeLabel": normalize::format_duration(avg_seconds),
            },
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "report.generate" => Some(handle_generate(state, req)),
        _ => None,
    }
}
