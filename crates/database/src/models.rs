//! Database models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// One append-only audit log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Auto-incrementing ID.
    pub id: i32,
    /// Intercom admin id, if the event carried one.
    pub user_id: Option<String>,
    /// Admin display name, if known.
    pub user_name: Option<String>,
    /// Admin email, if known.
    pub user_email: Option<String>,
    /// Action label (e.g., "sign_in", "sign_out").
    pub action: String,
    /// Client IP the event was recorded from.
    pub ip_address: Option<String>,
    /// Client User-Agent header.
    pub user_agent: Option<String>,
    /// Insertion timestamp, set by the database clock.
    pub created_at: NaiveDateTime,
}

/// One per-day response time metric row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResponseTimeMetric {
    /// Collection timestamp for the day's metrics run.
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
    /// Conversation ids behind `count_5_plus_min`, as a JSON array.
    pub conversation_ids_5_plus_min: Option<Value>,
    /// Conversation ids behind `count_10_plus_min`, as a JSON array.
    pub conversation_ids_10_plus_min: Option<Value>,
}
