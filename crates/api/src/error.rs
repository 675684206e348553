//! Error types for the dashboard API.
//!
//! Each variant carries the exact response body the dashboard frontend
//! already consumes, so changing a message here is a wire-format change.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use database::DatabaseError;
use intercom_client::IntercomError;

/// Errors that can occur while serving API requests.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation.
    #[error("{0}")]
    Validation(&'static str),

    /// Protected route called without a session cookie.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Session cookie was rejected by Intercom.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// An environment variable this route needs is unset.
    #[error("{0} not configured")]
    MissingConfig(&'static str),

    /// Intercom call failed.
    #[error(transparent)]
    Intercom(#[from] IntercomError),

    /// Anything that broke while serving the audit log read.
    #[error("Failed to fetch audit logs")]
    AuditQuery(String),

    /// Metric read failed.
    #[error("{0}")]
    MetricQuery(String),

    /// Snapshot or metric write failed.
    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": message }))
            }
            ApiError::NotAuthenticated | ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": self.to_string() }),
            ),
            ApiError::MissingConfig(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": self.to_string() }),
                )
            }
            ApiError::Intercom(err) => {
                tracing::error!("Intercom request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": err.to_string() }),
                )
            }
            ApiError::AuditQuery(details) => {
                tracing::error!("Failed to fetch audit logs: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Failed to fetch audit logs", "details": details }),
                )
            }
            ApiError::MetricQuery(message) => {
                tracing::error!("Failed to read response time metrics: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": message }),
                )
            }
            ApiError::Storage(err) => {
                tracing::error!("Storage operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({
                        "error": err.to_string(),
                        "detail": err.detail().unwrap_or_else(|| "Unknown error".to_string()),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
