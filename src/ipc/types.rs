use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::RawRecord;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The record set currently loaded into the process. Replaced wholesale by
/// each `records.load`; nothing is persisted.
pub struct Dataset {
    pub id: String,
    pub loaded_at: DateTime<Utc>,
    pub rows: Vec<RawRecord>,
}

pub struct AppState {
    pub dataset: Option<Dataset>,
}
