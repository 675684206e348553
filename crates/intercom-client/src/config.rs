//! Configuration types for the Intercom client.

/// OAuth scopes requested during login.
pub const OAUTH_SCOPES: &str = "conversations.read conversations.list teams.read admins.read";

/// Intercom API version sent with every request.
pub const API_VERSION: &str = "2.10";

/// Configuration for connecting to Intercom.
#[derive(Debug, Clone)]
pub struct IntercomConfig {
    /// Base URL of the REST API (e.g., "https://api.intercom.io").
    pub api_base: String,
    /// Base URL of the web app, used for the OAuth authorization page.
    pub app_base: String,
}

impl IntercomConfig {
    /// Create a configuration with a custom API base URL.
    ///
    /// The app base keeps its default; tests point `api_base` at a local
    /// mock server.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    /// Get the admin profile endpoint URL.
    pub fn me_url(&self) -> String {
        format!("{}/me", self.api_base)
    }

    /// Get the conversation search endpoint URL.
    pub fn search_url(&self) -> String {
        format!("{}/conversations/search", self.api_base)
    }

    /// Get the OAuth token exchange endpoint URL.
    pub fn token_url(&self) -> String {
        format!("{}/auth/eagle/token", self.api_base)
    }

    /// Build the OAuth authorization URL the browser is redirected to.
    pub fn authorize_url(&self, client_id: &str, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/oauth?client_id={}&redirect_uri={}&response_type=code&state={}&scope={}",
            self.app_base,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
            urlencoding::encode(OAUTH_SCOPES),
        )
    }
}

impl Default for IntercomConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.intercom.io".to_string(),
            app_base: "https://app.intercom.com".to_string(),
        }
    }
}
