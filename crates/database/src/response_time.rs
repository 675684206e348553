//! Response time metric storage.
//!
//! One row per day, overwritten by the dashboard after each metrics run,
//! plus date-windowed reads for charting.
//!
//! Percentages live in `DECIMAL(5,2)` columns. They are bound and read
//! through `::float8` casts so the crate stays on plain `f64` instead of
//! pulling in a decimal type.

use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::ResponseTimeMetric;

/// Column list shared by every read, with percentage casts applied.
const COLUMNS: &str = "timestamp, date, count_5_plus_min, count_5_to_10_min, count_10_plus_min, \
     total_conversations, percentage_5_plus_min::float8 AS percentage_5_plus_min, \
     percentage_5_to_10_min::float8 AS percentage_5_to_10_min, \
     percentage_10_plus_min::float8 AS percentage_10_plus_min, \
     conversation_ids_5_plus_min, conversation_ids_10_plus_min";

/// A new per-day metric to upsert.
#[derive(Debug, Clone)]
pub struct NewResponseTimeMetric {
    /// Collection timestamp for the metrics run.
    pub timestamp: NaiveDateTime,
    /// Day key, `YYYY-MM-DD`.
    pub date: String,
    /// Conversations that waited 5+ minutes.
    pub count_5_plus_min: i32,
    /// Conversations that waited 5-10 minutes.
    pub count_5_to_10_min: i32,
    /// Conversations that waited 10+ minutes.
    pub count_10_plus_min: i32,
    /// Total open conversations in the sample.
    pub total_conversations: i32,
    /// Percentage that waited 5+ minutes.
    pub percentage_5_plus_min: f64,
    /// Percentage that waited 5-10 minutes.
    pub percentage_5_to_10_min: f64,
    /// Percentage that waited 10+ minutes.
    pub percentage_10_plus_min: f64,
    /// Conversation ids behind `count_5_plus_min`.
    pub conversation_ids_5_plus_min: Option<Value>,
    /// Conversation ids behind `count_10_plus_min`.
    pub conversation_ids_10_plus_min: Option<Value>,
}

/// Date window for metric reads. Bounds are inclusive `YYYY-MM-DD` keys
/// compared against the `date` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricRange {
    /// Every stored row.
    All,
    /// Rows on or after the given day.
    From(String),
    /// Rows on or before the given day.
    Until(String),
    /// Rows between the two days.
    Between(String, String),
}

/// Create the metrics table if it does not exist.
pub async fn ensure_table(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS response_time_metrics (
            id SERIAL PRIMARY KEY,
            timestamp TIMESTAMP NOT NULL,
            date VARCHAR(10) NOT NULL,
            count_5_plus_min INTEGER NOT NULL DEFAULT 0,
            count_5_to_10_min INTEGER NOT NULL DEFAULT 0,
            count_10_plus_min INTEGER NOT NULL,
            total_conversations INTEGER NOT NULL,
            percentage_5_plus_min DECIMAL(5,2) NOT NULL DEFAULT 0,
            percentage_5_to_10_min DECIMAL(5,2) NOT NULL DEFAULT 0,
            percentage_10_plus_min DECIMAL(5,2) NOT NULL,
            conversation_ids_5_plus_min JSONB,
            conversation_ids_10_plus_min JSONB,
            created_at TIMESTAMP DEFAULT NOW(),
            UNIQUE(date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert or overwrite the metric row for one day.
pub async fn upsert(pool: &PgPool, metric: &NewResponseTimeMetric) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO response_time_metrics (
            timestamp, date, count_5_plus_min, count_5_to_10_min, count_10_plus_min,
            total_conversations, percentage_5_plus_min, percentage_5_to_10_min,
            percentage_10_plus_min, conversation_ids_5_plus_min, conversation_ids_10_plus_min
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7::float8, $8::float8, $9::float8, $10, $11)
        ON CONFLICT (date)
        DO UPDATE SET
            timestamp = EXCLUDED.timestamp,
            count_5_plus_min = EXCLUDED.count_5_plus_min,
            count_5_to_10_min = EXCLUDED.count_5_to_10_min,
            count_10_plus_min = EXCLUDED.count_10_plus_min,
            total_conversations = EXCLUDED.total_conversations,
            percentage_5_plus_min = EXCLUDED.percentage_5_plus_min,
            percentage_5_to_10_min = EXCLUDED.percentage_5_to_10_min,
            percentage_10_plus_min = EXCLUDED.percentage_10_plus_min,
            conversation_ids_5_plus_min = EXCLUDED.conversation_ids_5_plus_min,
            conversation_ids_10_plus_min = EXCLUDED.conversation_ids_10_plus_min,
            created_at = NOW()
        "#,
    )
    .bind(metric.timestamp)
    .bind(&metric.date)
    .bind(metric.count_5_plus_min)
    .bind(metric.count_5_to_10_min)
    .bind(metric.count_10_plus_min)
    .bind(metric.total_conversations)
    .bind(metric.percentage_5_plus_min)
    .bind(metric.percentage_5_to_10_min)
    .bind(metric.percentage_10_plus_min)
    .bind(&metric.conversation_ids_5_plus_min)
    .bind(&metric.conversation_ids_10_plus_min)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read metric rows inside a date window.
///
/// `All` sorts newest-first for full-history exports; the bounded windows
/// sort ascending for charting.
pub async fn query(pool: &PgPool, range: &MetricRange) -> Result<Vec<ResponseTimeMetric>> {
    let rows = match range {
        MetricRange::All => {
            sqlx::query_as::<_, ResponseTimeMetric>(&format!(
                "SELECT {COLUMNS} FROM response_time_metrics ORDER BY date DESC, timestamp DESC"
            ))
            .fetch_all(pool)
            .await?
        }
        MetricRange::From(start) => {
            sqlx::query_as::<_, ResponseTimeMetric>(&format!(
                "SELECT {COLUMNS} FROM response_time_metrics WHERE date >= $1 ORDER BY timestamp ASC"
            ))
            .bind(start)
            .fetch_all(pool)
            .await?
        }
        MetricRange::Until(end) => {
            sqlx::query_as::<_, ResponseTimeMetric>(&format!(
                "SELECT {COLUMNS} FROM response_time_metrics WHERE date <= $1 ORDER BY timestamp ASC"
            ))
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        MetricRange::Between(start, end) => {
            sqlx::query_as::<_, ResponseTimeMetric>(&format!(
                "SELECT {COLUMNS} FROM response_time_metrics \
                 WHERE date >= $1 AND date <= $2 ORDER BY timestamp ASC"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
