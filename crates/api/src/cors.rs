//! CORS negotiation.
//!
//! The dashboard is served from several places at once: the production
//! domain, Vercel preview deploys, localhost, and embedded inside Sigma.
//! An exact-match allow-list is not enough, so recognized domains get the
//! request origin echoed back and everything else falls back to the
//! configured origin, which the browser then rejects.

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, REFERER,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Decide which origin to echo back in `Access-Control-Allow-Origin`.
pub fn resolve_origin(allowed: &str, origin: Option<&str>, referer: Option<&str>) -> String {
    if allowed == "*" {
        return "*".to_string();
    }

    // Some embedded contexts strip the Origin header, so fall back to the
    // scheme and host of the Referer.
    let request_origin = origin
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .or_else(|| referer.map(origin_of_referer).filter(|r| !r.is_empty()));

    if let Some(request_origin) = request_origin {
        if request_origin == allowed
            || request_origin.contains("vercel.app")
            || request_origin.contains("localhost")
            || request_origin.contains("sigmacomputing.com")
        {
            return request_origin;
        }
    }

    allowed.to_string()
}

/// Reduce a referer URL to scheme plus host: `https://a.example/b?c=1`
/// becomes `https://a.example`.
fn origin_of_referer(referer: &str) -> String {
    referer.splitn(4, '/').take(3).collect::<Vec<_>>().join("/")
}

/// Stamp CORS headers on every response and short-circuit preflights
/// with an empty 200 before route dispatch.
pub async fn apply(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let referer = request
        .headers()
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let allow_origin = resolve_origin(
        &state.config.allowed_origin,
        origin.as_deref(),
        referer.as_deref(),
    );

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&allow_origin) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    response
}
