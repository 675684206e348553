//! Response time metric endpoints.
//!
//! The dashboard computes first-response metrics client-side and posts one
//! row per day; reads hand back camelCase JSON for charting. Two field
//! names keep a lowercase `to` (`count5to10Min`, `percentage5to10Min`)
//! because that is what the frontend already stores and expects.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use database::response_time::{self, NewResponseTimeMetric};
use database::{MetricRange, ResponseTimeMetric};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Metric save request, camelCase from the frontend.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMetricRequest {
    pub timestamp: Option<DateTime<Utc>>,
    pub date: Option<String>,
    pub count_5_plus_min: Option<i32>,
    #[serde(rename = "count5to10Min")]
    pub count_5_to_10_min: Option<i32>,
    pub count_10_plus_min: Option<i32>,
    pub total_conversations: Option<i32>,
    pub percentage_5_plus_min: Option<f64>,
    #[serde(rename = "percentage5to10Min")]
    pub percentage_5_to_10_min: Option<f64>,
    pub percentage_10_plus_min: Option<f64>,
    pub conversation_ids_5_plus_min: Option<Value>,
    pub conversation_ids_10_plus_min: Option<Value>,
}

/// Query parameters for metric reads.
#[derive(Deserialize)]
pub struct MetricsQuery {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub all: Option<String>,
}

impl MetricsQuery {
    /// Date window for this request. `all=true` beats any date bounds,
    /// empty-string parameters count as absent, and no bounds at all
    /// means the last seven days.
    fn range(&self) -> MetricRange {
        if self.all.as_deref() == Some("true") {
            return MetricRange::All;
        }

        let start = self.start_date.as_deref().filter(|date| !date.is_empty());
        let end = self.end_date.as_deref().filter(|date| !date.is_empty());
        match (start, end) {
            (Some(start), Some(end)) => MetricRange::Between(start.to_string(), end.to_string()),
            (Some(start), None) => MetricRange::From(start.to_string()),
            (None, Some(end)) => MetricRange::Until(end.to_string()),
            (None, None) => {
                let week_ago = Utc::now() - Duration::days(7);
                MetricRange::From(week_ago.format("%Y-%m-%d").to_string())
            }
        }
    }
}

/// One metric row shaped for the frontend.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResponse {
    pub timestamp: NaiveDateTime,
    pub date: String,
    pub count_5_plus_min: i32,
    #[serde(rename = "count5to10Min")]
    pub count_5_to_10_min: i32,
    pub count_10_plus_min: i32,
    pub total_conversations: i32,
    pub percentage_5_plus_min: f64,
    #[serde(rename = "percentage5to10Min")]
    pub percentage_5_to_10_min: f64,
    pub percentage_10_plus_min: f64,
    pub conversation_ids_5_plus_min: Value,
    pub conversation_ids_10_plus_min: Value,
}

impl From<ResponseTimeMetric> for MetricResponse {
    fn from(metric: ResponseTimeMetric) -> Self {
        Self {
            timestamp: metric.timestamp,
            date: metric.date,
            count_5_plus_min: metric.count_5_plus_min,
            count_5_to_10_min: metric.count_5_to_10_min,
            count_10_plus_min: metric.count_10_plus_min,
            total_conversations: metric.total_conversations,
            percentage_5_plus_min: metric.percentage_5_plus_min,
            percentage_5_to_10_min: metric.percentage_5_to_10_min,
            percentage_10_plus_min: metric.percentage_10_plus_min,
            // Rows written before the id lists existed hold NULL; the
            // frontend expects an array either way.
            conversation_ids_5_plus_min: metric.conversation_ids_5_plus_min.unwrap_or_else(|| json!([])),
            conversation_ids_10_plus_min: metric.conversation_ids_10_plus_min.unwrap_or_else(|| json!([])),
        }
    }
}

/// Metric list response.
#[derive(Serialize)]
pub struct MetricsResponse {
    pub metrics: Vec<MetricResponse>,
}

/// Upsert the metric row for one day.
pub async fn save(
    State(state): State<AppState>,
    Json(req): Json<SaveMetricRequest>,
) -> Result<Json<Value>> {
    let date = req.date.as_deref().filter(|date| !date.is_empty());
    let (Some(timestamp), Some(date), Some(count_10_plus_min)) =
        (req.timestamp, date, req.count_10_plus_min)
    else {
        return Err(ApiError::Validation(
            "Invalid metric data: timestamp, date, and count10PlusMin are required",
        ));
    };

    let metric = NewResponseTimeMetric {
        timestamp: timestamp.naive_utc(),
        date: date.to_string(),
        count_5_plus_min: req.count_5_plus_min.unwrap_or(0),
        count_5_to_10_min: req.count_5_to_10_min.unwrap_or(0),
        count_10_plus_min,
        total_conversations: req.total_conversations.unwrap_or(0),
        percentage_5_plus_min: req.percentage_5_plus_min.unwrap_or(0.0),
        percentage_5_to_10_min: req.percentage_5_to_10_min.unwrap_or(0.0),
        percentage_10_plus_min: req.percentage_10_plus_min.unwrap_or(0.0),
        conversation_ids_5_plus_min: req.conversation_ids_5_plus_min,
        conversation_ids_10_plus_min: req.conversation_ids_10_plus_min,
    };

    response_time::ensure_table(state.db.pool()).await?;
    response_time::upsert(state.db.pool(), &metric).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Response time metric saved"
    })))
}

/// List metric rows inside the requested date window.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>> {
    response_time::ensure_table(state.db.pool())
        .await
        .map_err(|err| ApiError::MetricQuery(err.to_string()))?;

    let metrics = response_time::query(state.db.pool(), &query.range())
        .await
        .map_err(|err| ApiError::MetricQuery(err.to_string()))?;

    Ok(Json(MetricsResponse {
        metrics: metrics.into_iter().map(MetricResponse::from).collect(),
    }))
}
