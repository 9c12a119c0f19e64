use serde_json::json;

use super::reports::{parse_role, parse_unit_range};
use crate::display;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Dataset, Request};
use crate::ranking;

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

fn handle_query(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student = match required_str(req, "student") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let role = match parse_role(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let range = match parse_unit_range(req) {
        Ok(Some(v)) => v,
        Ok(None) => return err(&req.id, "bad_params", "missing unitRange", None),
        Err(resp) => return resp,
    };
    let dataset = match dataset(state, req) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let (entries, total) = ranking::rank(&dataset.rows, range, role, &student);
    let my_rank = entries.iter().find(|e| e.name == student).map(|e| e.rank);

    let window: Vec<serde_json::Value> = ranking::window(&entries, &student)
        .iter()
        .map(|e| {
            let mut v = serde_json::to_value(e).unwrap_or(serde_json::Value::Null);
            let masked = if e.name == student {
                e.name.clone()
            } else {
                ranking::mask_name(&e.name)
            };
            v["maskedName"] = json!(masked);
            v
        })
        .collect();

    ok(
        &req.id,
        json!({
            "total": total,
            "myRank": my_rank,
            "comment": display::rank_comment(my_rank, total),
            "entries": window,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "ranking.query" => Some(handle_query(state, req)),
        _ => None,
    }
}
