//! Intercom OAuth session routes.
//!
//! The browser is sent to Intercom's authorization page, comes back to the
//! callback with a code, and leaves with the access token in an httpOnly
//! cookie. No session state is kept server-side: every protected route
//! verifies the cookie against Intercom's `/me`.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::header::ORIGIN;
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use intercom_client::IntercomError;

use crate::audit;
use crate::config::Config;
use crate::cookies::{
    build_cookie, clear_cookie, get_cookie, OAUTH_COOKIE_MAX_AGE, POPUP_COOKIE, REDIRECT_COOKIE,
    SESSION_COOKIE, STATE_COOKIE,
};
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Session cookie lifetime when the token response has no `expires_in`.
const THIRTY_DAYS: u64 = 60 * 60 * 24 * 30;

/// Query parameters for the login route.
#[derive(Deserialize)]
pub struct LoginQuery {
    /// Where to send the user once authentication completes.
    pub redirect: Option<String>,
}

/// Query parameters Intercom sends to the callback.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub popup: Option<String>,
}

/// The redirect URI registered with Intercom.
///
/// Prefers the configured value; otherwise derived from the request
/// `Origin` so preview deployments resolve to themselves.
fn callback_uri(config: &Config, headers: &HeaderMap) -> String {
    if let Some(uri) = &config.intercom_redirect_uri {
        return uri.clone();
    }

    let base = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .filter(|origin| !origin.is_empty())
        .unwrap_or("http://localhost:3000");
    format!("{base}/api/auth/intercom/callback")
}

/// 302 with any number of Set-Cookie headers attached.
fn redirect_with_cookies(location: &str, cookies: Vec<String>) -> Response {
    let mut headers = vec![(header::LOCATION, location.to_string())];
    headers.extend(cookies.into_iter().map(|cookie| (header::SET_COOKIE, cookie)));
    (StatusCode::FOUND, AppendHeaders(headers), ()).into_response()
}

/// 302 to the frontend with a human-readable error in the query string.
fn error_redirect(message: &str) -> Response {
    let location = format!("/?error={}", urlencoding::encode(message));
    (
        StatusCode::FOUND,
        AppendHeaders(vec![(header::LOCATION, location)]),
        (),
    )
        .into_response()
}

fn set_cookie_headers(cookies: Vec<String>) -> AppendHeaders<Vec<(HeaderName, String)>> {
    AppendHeaders(
        cookies
            .into_iter()
            .map(|cookie| (header::SET_COOKIE, cookie))
            .collect(),
    )
}

/// Start the OAuth flow: stash state, redirect target, and popup flag in
/// short-lived cookies, then send the browser to Intercom.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let client_id = state
        .config
        .intercom_client_id
        .as_deref()
        .ok_or(ApiError::MissingConfig("INTERCOM_CLIENT_ID"))?;

    // CSRF nonce, checked against the oauth_state cookie on the way back.
    let nonce = Uuid::new_v4().simple().to_string();
    let redirect = query
        .redirect
        .filter(|redirect| !redirect.is_empty())
        .unwrap_or_else(|| "/".to_string());
    let is_popup = redirect.contains("popup=true");
    let production = state.config.production;

    let cookies = vec![
        build_cookie(STATE_COOKIE, &nonce, OAUTH_COOKIE_MAX_AGE, production),
        build_cookie(
            REDIRECT_COOKIE,
            &urlencoding::encode(&redirect),
            OAUTH_COOKIE_MAX_AGE,
            production,
        ),
        build_cookie(
            POPUP_COOKIE,
            if is_popup { "true" } else { "false" },
            OAUTH_COOKIE_MAX_AGE,
            production,
        ),
    ];

    let authorize_url = state.intercom.config().authorize_url(
        client_id,
        &callback_uri(&state.config, &headers),
        &nonce,
    );

    Ok(redirect_with_cookies(&authorize_url, cookies))
}

/// Finish the OAuth flow: check state, trade the code for a token, record
/// the sign-in, and hand the browser back to the frontend.
///
/// Every failure becomes a `/?error=…` redirect so the user lands on the
/// dashboard with a message instead of a bare error page.
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Response {
    // Provider-reported failure wins over everything else.
    if let Some(error) = query.error.as_deref().filter(|e| !e.is_empty()) {
        return error_redirect(error);
    }

    let state_param = query.state.as_deref().filter(|s| !s.is_empty());
    let cookie_state = get_cookie(&headers, STATE_COOKIE);
    if state_param.is_none() || state_param != cookie_state.as_deref() {
        return error_redirect("Invalid state parameter");
    }

    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return error_redirect("No authorization code received");
    };

    let (Some(client_id), Some(client_secret)) = (
        state.config.intercom_client_id.as_deref(),
        state.config.intercom_client_secret.as_deref(),
    ) else {
        return error_redirect("OAuth not configured");
    };

    let redirect_uri = callback_uri(&state.config, &headers);
    let token = match state
        .intercom
        .exchange_code(client_id, client_secret, code, &redirect_uri)
        .await
    {
        Ok(token) => token,
        Err(IntercomError::Api { status, body }) => {
            tracing::error!(status, "Token exchange error: {}", body);
            return error_redirect("Failed to exchange authorization code");
        }
        Err(err) => {
            tracing::error!("OAuth callback error: {}", err);
            return error_redirect("Authentication failed");
        }
    };

    let Some(access_token) = token.access_token.as_deref().filter(|t| !t.is_empty()) else {
        return error_redirect("No access token received");
    };

    // A profile failure is not fatal: the token may still be good, we just
    // cannot attribute the sign-in. Transport errors are fatal because they
    // prove nothing either way.
    let profile = match state.intercom.verify_session(access_token).await {
        Ok(profile) => Some(profile),
        Err(IntercomError::NotAuthenticated) => None,
        Err(err) => {
            tracing::error!("OAuth callback error: {}", err);
            return error_redirect("Authentication failed");
        }
    };

    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    if let Some(profile) = &profile {
        audit::record(&state.db, "sign_in", Some(profile), &headers, peer).await;
    }

    let production = state.config.production;
    let max_age = token.expires_in.filter(|&secs| secs > 0).unwrap_or(THIRTY_DAYS);
    let cookies = vec![
        build_cookie(SESSION_COOKIE, access_token, max_age, production),
        clear_cookie(STATE_COOKIE, production),
        clear_cookie(REDIRECT_COOKIE, production),
        clear_cookie(POPUP_COOKIE, production),
    ];

    // The redirect target was percent-encoded into a cookie at login time.
    let redirect = get_cookie(&headers, REDIRECT_COOKIE)
        .filter(|target| !target.is_empty())
        .map(|target| match urlencoding::decode(&target) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => "/".to_string(),
        })
        .unwrap_or_else(|| "/".to_string());

    let is_popup = query.popup.as_deref() == Some("true")
        || get_cookie(&headers, POPUP_COOKIE).as_deref() == Some("true");

    if is_popup {
        let user_json = profile
            .as_ref()
            .and_then(|profile| serde_json::to_string(profile).ok())
            .unwrap_or_else(|| "null".to_string());
        return (
            set_cookie_headers(cookies),
            Html(popup_success_page(&user_json, &redirect)),
        )
            .into_response();
    }

    let separator = if redirect.contains('?') { '&' } else { '?' };
    redirect_with_cookies(&format!("{redirect}{separator}authenticated=true"), cookies)
}

/// Page served to a popup window after a successful callback. Posts the
/// result to the opener and closes itself; falls back to a plain redirect
/// when there is no opener.
fn popup_success_page(user_json: &str, redirect: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>Authentication Successful</title>
  </head>
  <body>
    <script>
      if (window.opener) {{
        // Wait a moment for cookies to be set, then send message
        setTimeout(() => {{
          const origin = window.location.origin;
          window.opener.postMessage({{
            type: 'OAUTH_SUCCESS',
            user: {user_json},
            origin: origin
          }}, origin);
          setTimeout(() => window.close(), 500);
        }}, 200);
      }} else {{
        window.location.href = '{redirect}?authenticated=true';
      }}
    </script>
    <p>Authentication successful. This window will close automatically.</p>
  </body>
</html>
"#
    )
}

/// Verify the session cookie if present (so the sign-out reaches the audit
/// log), then expire every auth cookie. Nothing here can fail the logout.
async fn end_session(
    state: &AppState,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
) -> Vec<String> {
    if let Some(token) = get_cookie(headers, SESSION_COOKIE) {
        match state.intercom.verify_session(&token).await {
            Ok(profile) => {
                audit::record(&state.db, "sign_out", Some(&profile), headers, peer).await;
            }
            Err(err) => {
                tracing::debug!("Skipping sign-out audit record: {}", err);
            }
        }
    }

    let production = state.config.production;
    vec![
        clear_cookie(SESSION_COOKIE, production),
        clear_cookie(STATE_COOKIE, production),
        clear_cookie(REDIRECT_COOKIE, production),
        clear_cookie(POPUP_COOKIE, production),
    ]
}

/// Browser logout: clear cookies and land on the home page.
pub async fn logout_get(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let cookies = end_session(&state, &headers, peer).await;
    redirect_with_cookies("/?logged_out=true", cookies)
}

/// Programmatic logout: clear cookies and confirm as JSON.
pub async fn logout_post(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let cookies = end_session(&state, &headers, peer).await;
    (
        set_cookie_headers(cookies),
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
        .into_response()
}

/// Who is logged in, according to the session cookie.
///
/// The body always carries `authenticated` so the frontend can branch
/// without looking at the status code.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = get_cookie(&headers, SESSION_COOKIE) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Not authenticated", "authenticated": false })),
        )
            .into_response();
    };

    match state.intercom.verify_session(&token).await {
        Ok(profile) => Json(json!({ "authenticated": true, "user": profile })).into_response(),
        Err(IntercomError::NotAuthenticated) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid or expired token", "authenticated": false })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Error fetching user info: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string(), "authenticated": false })),
            )
                .into_response()
        }
    }
}
