use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    let dataset = state.dataset.as_ref();
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "datasetId": dataset.map(|d| d.id.clone()),
            "rowCount": dataset.map(|d| d.rows.len()).unwrap_or(0),
            "loadedAt": dataset.map(|d| d.loaded_at.to_rfc3339()),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        _ => None,
    }
}
