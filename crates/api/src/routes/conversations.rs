//! Open-conversation aggregation endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Collect every open conversation assigned to the support team.
///
/// The team id is fixed inside the Intercom client: this dashboard only
/// tracks the support inbox, so the route takes no parameters and the
/// response is the bare array the frontend charts from.
pub async fn open_team(State(state): State<AppState>) -> Result<Json<Vec<Value>>> {
    let token = state
        .config
        .intercom_token
        .as_deref()
        .ok_or(ApiError::MissingConfig("INTERCOM_TOKEN"))?;

    let conversations = state.intercom.fetch_open_team_conversations(token).await?;
    Ok(Json(conversations))
}
