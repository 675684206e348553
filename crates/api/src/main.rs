//! HTTP API for the support dashboard.
//!
//! Proxies Intercom OAuth for the frontend, aggregates open support
//! conversations, and persists audit logs, daily snapshots, and response
//! time metrics to Postgres.

mod audit;
mod config;
mod cookies;
mod cors;
mod error;
mod routes;
mod state;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;

use axum::middleware;
use axum::Router;
use database::Database;
use intercom_client::{IntercomClient, IntercomConfig};
use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

/// Assemble the application: every route behind the CORS layer, so
/// preflights short-circuit before dispatch.
fn app(state: AppState) -> Router {
    routes::router()
        .layer(middleware::from_fn_with_state(state.clone(), cors::apply))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;

    // Prepare the lazy database pool and create tables up front. Schema
    // setup can fail here without stopping the server: the database may
    // still be coming up, and every write path re-ensures its table.
    let db = Database::connect(&config.postgres_url)?;
    if let Err(err) = db.ensure_schema().await {
        warn!("Could not ensure database schema at startup: {}", err);
    }

    let intercom = IntercomClient::new(IntercomConfig::default())?;

    let addr = config.bind_addr();
    let state = AppState::new(config, db, intercom);
    let app = app(state);

    info!(addr = %addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
