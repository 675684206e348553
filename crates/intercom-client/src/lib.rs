//! Intercom REST API client.
//!
//! This crate wraps the handful of Intercom endpoints the queue health
//! backend depends on: admin session verification (`GET /me`), the OAuth
//! code exchange, authorization-URL construction, and the paginated
//! conversation search used to collect every open conversation assigned to
//! the support team.
//!
//! # Example
//!
//! ```no_run
//! use intercom_client::{IntercomClient, IntercomConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IntercomClient::new(IntercomConfig::default())?;
//!
//!     let conversations = client
//!         .fetch_open_team_conversations("my-access-token")
//!         .await?;
//!     println!("{} open conversations", conversations.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::IntercomClient;
pub use config::IntercomConfig;
pub use error::IntercomError;
pub use types::{AdminProfile, NextCursor, SearchResponse, TokenResponse};
