//! Intercom API HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{IntercomConfig, API_VERSION};
use crate::error::{IntercomError, Result};
use crate::types::{AdminProfile, SearchResponse, TokenResponse};

/// Conversation state the aggregator filters on.
const SEARCH_STATE: &str = "open";

/// Team whose open conversations the aggregator collects.
pub const SUPPORT_TEAM_ID: &str = "5480079";

/// Conversations requested per search page.
pub const SEARCH_PAGE_SIZE: u32 = 150;

/// Safety cap on pages fetched in one aggregation.
pub const MAX_SEARCH_PAGES: u32 = 100;

/// Body of a `POST /conversations/search` request.
#[derive(Debug, Serialize)]
struct SearchRequest {
    query: SearchQuery,
    pagination: SearchPagination,
}

#[derive(Debug, Serialize)]
struct SearchQuery {
    operator: &'static str,
    value: Vec<SearchFilter>,
}

#[derive(Debug, Serialize)]
struct SearchFilter {
    field: &'static str,
    operator: &'static str,
    value: &'static str,
}

#[derive(Debug, Serialize)]
struct SearchPagination {
    per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    starting_after: Option<String>,
}

impl SearchRequest {
    /// One page of the fixed open-conversations query for the support team.
    fn open_team_page(starting_after: Option<String>) -> Self {
        Self {
            query: SearchQuery {
                operator: "AND",
                value: vec![
                    SearchFilter {
                        field: "state",
                        operator: "=",
                        value: SEARCH_STATE,
                    },
                    SearchFilter {
                        field: "team_assignee_id",
                        operator: "=",
                        value: SUPPORT_TEAM_ID,
                    },
                ],
            },
            pagination: SearchPagination {
                per_page: SEARCH_PAGE_SIZE,
                starting_after,
            },
        }
    }
}

/// Body of the OAuth code exchange request.
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Client for the Intercom REST API.
#[derive(Debug, Clone)]
pub struct IntercomClient {
    http: Client,
    config: IntercomConfig,
}

impl IntercomClient {
    /// Create a new client with the given configuration.
    pub fn new(config: IntercomConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(IntercomError::Http)?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &IntercomConfig {
        &self.config
    }

    /// Verify a session token against `GET /me` and return the admin
    /// profile it belongs to.
    ///
    /// Any non-success status means the credential was rejected
    /// ([`IntercomError::NotAuthenticated`]); transport failures surface as
    /// [`IntercomError::Http`] since they prove nothing about the session.
    pub async fn verify_session(&self, token: &str) -> Result<AdminProfile> {
        let response = self
            .http
            .get(self.config.me_url())
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .header("Intercom-Version", API_VERSION)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IntercomError::NotAuthenticated);
        }

        Ok(response.json().await?)
    }

    /// Exchange an OAuth authorization code for an access token.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        let request = TokenExchangeRequest {
            client_id,
            client_secret,
            code,
            redirect_uri,
        };

        let response = self
            .http
            .post(self.config.token_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntercomError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch every open conversation assigned to the support team, paging
    /// through the search API until exhaustion.
    ///
    /// Stops when the response carries no next cursor, when the cursor is
    /// in a shape it does not recognize, or after [`MAX_SEARCH_PAGES`]
    /// pages (partial results are returned, not an error). A non-success
    /// status from any page fails the whole operation.
    pub async fn fetch_open_team_conversations(&self, token: &str) -> Result<Vec<Value>> {
        let auth_header = normalize_bearer(token);
        let url = self.config.search_url();

        let mut all = Vec::new();
        let mut starting_after: Option<String> = None;
        let mut page_count = 0u32;

        loop {
            let request = SearchRequest::open_team_page(starting_after.take());

            let response = self
                .http
                .post(&url)
                .header("Authorization", &auth_header)
                .header("Accept", "application/json")
                .header("Intercom-Version", API_VERSION)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(IntercomError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: SearchResponse = response.json().await?;
            let next = page.pages.as_ref().and_then(|pages| pages.next.clone());

            let items = page.into_items();
            let fetched = items.len();
            all.extend(items);
            page_count += 1;

            debug!(
                page = page_count,
                fetched,
                total = all.len(),
                "Fetched conversation search page"
            );

            if page_count >= MAX_SEARCH_PAGES {
                warn!(
                    pages = page_count,
                    "Reached page cap; stopping pagination"
                );
                break;
            }

            // No cursor means we've reached the last page.
            let Some(next) = next else {
                break;
            };

            match next.starting_after() {
                Some(cursor) => starting_after = Some(cursor.to_string()),
                None => {
                    // Unrecognized cursor shape; stop rather than loop on it.
                    warn!("Unrecognized pagination cursor; stopping pagination");
                    break;
                }
            }
        }

        Ok(all)
    }
}

/// Produce an Authorization header value, tolerating tokens stored with the
/// `Bearer ` prefix already in place.
fn normalize_bearer(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {}", token)
    }
}
