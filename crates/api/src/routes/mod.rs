//! Route handlers for the dashboard API.

pub mod audit_logs;
pub mod auth;
pub mod conversations;
pub mod health;
pub mod response_time;
pub mod snapshots;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // OAuth session flow
        .route("/api/auth/intercom/login", get(auth::login))
        .route("/api/auth/intercom/callback", get(auth::callback))
        .route(
            "/api/auth/intercom/logout",
            get(auth::logout_get).post(auth::logout_post),
        )
        .route("/api/auth/intercom/me", get(auth::me))
        // Dashboard data
        .route("/api/audit-logs", get(audit_logs::list))
        .route("/api/snapshots/save", post(snapshots::save))
        .route("/api/response-time-metrics/get", get(response_time::list))
        .route("/api/response-time-metrics/save", post(response_time::save))
        // Conversation aggregation
        .route(
            "/intercom/conversations/open-team-5480079",
            get(conversations::open_team),
        )
}
