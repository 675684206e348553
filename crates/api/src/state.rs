//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use intercom_client::IntercomClient;

use crate::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<Config>,
    /// Database connection.
    pub db: Database,
    /// Intercom API client.
    pub intercom: IntercomClient,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: Config, db: Database, intercom: IntercomClient) -> Self {
        Self {
            config: Arc::new(config),
            db,
            intercom,
        }
    }
}
