//! Configuration loaded from environment variables.

use std::env;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind host.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Postgres connection string.
    pub postgres_url: String,
    /// Origin the CORS negotiation falls back to, or `*`.
    pub allowed_origin: String,
    /// Production mode switches cookies to `SameSite=None; Secure`.
    pub production: bool,
    /// Service token for the conversation aggregation endpoint.
    pub intercom_token: Option<String>,
    /// OAuth client id.
    pub intercom_client_id: Option<String>,
    /// OAuth client secret.
    pub intercom_client_secret: Option<String>,
    /// Fixed OAuth redirect URI, overriding origin detection.
    pub intercom_redirect_uri: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `HOST` | Server bind host | `0.0.0.0` |
    /// | `PORT` | Server bind port | `3000` |
    /// | `POSTGRES_URL` | Postgres connection string (falls back to `POSTGRES_URL_NON_POOLING`, then `POSTGRES_PRISMA_URL`) | (required) |
    /// | `ALLOWED_ORIGIN` | CORS fallback origin, `*` allows all | `https://app.sigmacomputing.com` |
    /// | `APP_ENV` | `production` enables cross-site cookies | (unset) |
    /// | `INTERCOM_TOKEN` | Service token for conversation aggregation | (unset) |
    /// | `INTERCOM_CLIENT_ID` | OAuth client id | (unset) |
    /// | `INTERCOM_CLIENT_SECRET` | OAuth client secret | (unset) |
    /// | `INTERCOM_REDIRECT_URI` | Fixed OAuth redirect URI | (derived from request origin) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let postgres_url = env::var("POSTGRES_URL")
            .or_else(|_| env::var("POSTGRES_URL_NON_POOLING"))
            .or_else(|_| env::var("POSTGRES_PRISMA_URL"))
            .map_err(|_| ConfigError::MissingPostgresUrl)?;

        let allowed_origin = env::var("ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "https://app.sigmacomputing.com".to_string());

        let production = env::var("APP_ENV")
            .map(|value| value == "production")
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            postgres_url,
            allowed_origin,
            production,
            intercom_token: env::var("INTERCOM_TOKEN").ok(),
            intercom_client_id: env::var("INTERCOM_CLIENT_ID").ok(),
            intercom_client_secret: env::var("INTERCOM_CLIENT_SECRET").ok(),
            intercom_redirect_uri: env::var("INTERCOM_REDIRECT_URI").ok(),
        })
    }

    /// Address string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("POSTGRES_URL environment variable is required (or POSTGRES_URL_NON_POOLING / POSTGRES_PRISMA_URL)")]
    MissingPostgresUrl,
}
