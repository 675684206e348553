//! Daily snapshot persistence.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use database::snapshot;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Snapshot save request.
#[derive(Deserialize)]
pub struct SaveSnapshotRequest {
    /// Day the snapshot describes, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// When the snapshot was captured.
    pub timestamp: Option<DateTime<Utc>>,
    /// The snapshot document, stored verbatim as JSONB.
    #[serde(rename = "tseData")]
    pub tse_data: Option<Value>,
}

/// Upsert the snapshot for one day. A second save for the same date
/// overwrites the first.
pub async fn save(
    State(state): State<AppState>,
    Json(req): Json<SaveSnapshotRequest>,
) -> Result<Json<Value>> {
    let date = req.date.as_deref().filter(|date| !date.is_empty());
    let tse_data = req.tse_data.as_ref().filter(|data| !data.is_null());
    let (Some(date), Some(tse_data)) = (date, tse_data) else {
        return Err(ApiError::Validation("Invalid snapshot data"));
    };

    snapshot::ensure_table(state.db.pool()).await?;
    snapshot::upsert(
        state.db.pool(),
        date,
        req.timestamp.map(|ts| ts.naive_utc()),
        tse_data,
    )
    .await?;

    Ok(Json(json!({ "success": true, "message": "Snapshot saved" })))
}
