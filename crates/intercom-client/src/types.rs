//! Wire types for the Intercom API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Admin profile returned by `GET /me`.
///
/// Only the fields the backend reads are typed; everything else is kept in
/// `extra` so the profile can be passed back to the frontend verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminProfile {
    /// Admin id. Intercom sends strings, but older payloads used numbers,
    /// so the raw value is kept and normalized via [`AdminProfile::id_string`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Remaining profile fields, preserved untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AdminProfile {
    /// The admin id as a string, whether Intercom sent a string or a number.
    pub fn id_string(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Response from the OAuth code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The granted access token, when the exchange succeeded.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token lifetime in seconds, when Intercom reports one.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Token type, typically "Bearer".
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Response envelope from `POST /conversations/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Conversations under the usual `data` key.
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    /// Older envelope key some responses use instead of `data`.
    #[serde(default)]
    pub conversations: Option<Vec<Value>>,
    /// Pagination envelope.
    #[serde(default)]
    pub pages: Option<Pages>,
}

impl SearchResponse {
    /// Items for this page, whichever envelope key carried them.
    pub fn into_items(self) -> Vec<Value> {
        self.data.or(self.conversations).unwrap_or_default()
    }
}

/// The `pages` object of a search response.
#[derive(Debug, Clone, Deserialize)]
pub struct Pages {
    /// Cursor for the next page; absent on the last page.
    #[serde(default)]
    pub next: Option<NextCursor>,
}

/// The `pages.next` cursor, which Intercom has shipped in two shapes.
///
/// Anything that is neither shape lands in `Other`, which decodes but
/// carries no cursor, so pagination stops instead of looping on a value it
/// cannot interpret.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NextCursor {
    /// Bare cursor string.
    Token(String),
    /// Object wrapping the cursor.
    StartingAfter {
        /// Cursor for the next page.
        starting_after: String,
    },
    /// Unrecognized shape.
    Other(Value),
}

impl NextCursor {
    /// The cursor to send as `pagination.starting_after`, if this shape
    /// carries one.
    pub fn starting_after(&self) -> Option<&str> {
        match self {
            NextCursor::Token(token) => Some(token),
            NextCursor::StartingAfter { starting_after } => Some(starting_after),
            NextCursor::Other(_) => None,
        }
    }
}
