//! Error types for the Intercom client.

use thiserror::Error;

/// Errors that can occur when talking to the Intercom API.
#[derive(Debug, Error)]
pub enum IntercomError {
    /// Transport-level failure (connection refused, timeout, bad TLS).
    ///
    /// Distinct from [`IntercomError::NotAuthenticated`]: a request that
    /// never reached Intercom proves nothing about the credential.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API, with the body text attached.
    #[error("Intercom error {status}: {body}")]
    Api { status: u16, body: String },

    /// The credential was rejected (any non-success status from `/me`).
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Result type for Intercom operations.
pub type Result<T> = std::result::Result<T, IntercomError>;
