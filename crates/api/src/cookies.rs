//! Session and OAuth cookie handling.
//!
//! The frontend is embedded in an iframe on another origin, so production
//! cookies need `SameSite=None; Secure` to survive cross-site requests.
//! Local development stays on `SameSite=Lax` so plain-HTTP testing works.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Cookie carrying the Intercom access token for the session.
pub const SESSION_COOKIE: &str = "intercom_access_token";
/// CSRF state parameter stored for the duration of the OAuth dance.
pub const STATE_COOKIE: &str = "oauth_state";
/// Where to send the user after the OAuth callback completes.
pub const REDIRECT_COOKIE: &str = "oauth_redirect";
/// Whether the login was opened in a popup window.
pub const POPUP_COOKIE: &str = "oauth_popup";

/// Lifetime of the OAuth handshake cookies, in seconds.
pub const OAUTH_COOKIE_MAX_AGE: u64 = 600;

fn cookie_options(production: bool) -> &'static str {
    if production {
        "HttpOnly; SameSite=None; Secure; Path=/"
    } else {
        "HttpOnly; SameSite=Lax; Path=/"
    }
}

/// Serialize a Set-Cookie value with the environment-appropriate attributes.
pub fn build_cookie(name: &str, value: &str, max_age: u64, production: bool) -> String {
    format!(
        "{}={}; {}; Max-Age={}",
        name,
        value,
        cookie_options(production),
        max_age
    )
}

/// Serialize a Set-Cookie value that expires the named cookie.
pub fn clear_cookie(name: &str, production: bool) -> String {
    build_cookie(name, "", 0, production)
}

/// Pull a single cookie value out of the request's Cookie header.
pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_get_cookie_finds_named_value() {
        let headers =
            headers_with_cookie("oauth_state=abc123; intercom_access_token=tok; oauth_popup=true");
        assert_eq!(
            get_cookie(&headers, SESSION_COOKIE),
            Some("tok".to_string())
        );
        assert_eq!(get_cookie(&headers, STATE_COOKIE), Some("abc123".to_string()));
        assert_eq!(get_cookie(&headers, POPUP_COOKIE), Some("true".to_string()));
    }

    #[test]
    fn test_get_cookie_missing() {
        let headers = headers_with_cookie("oauth_state=abc123");
        assert_eq!(get_cookie(&headers, SESSION_COOKIE), None);
        assert_eq!(get_cookie(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn test_build_cookie_production_attributes() {
        let cookie = build_cookie(STATE_COOKIE, "xyz", OAUTH_COOKIE_MAX_AGE, true);
        assert_eq!(
            cookie,
            "oauth_state=xyz; HttpOnly; SameSite=None; Secure; Path=/; Max-Age=600"
        );
    }

    #[test]
    fn test_build_cookie_development_attributes() {
        let cookie = build_cookie(SESSION_COOKIE, "tok", 2_592_000, false);
        assert_eq!(
            cookie,
            "intercom_access_token=tok; HttpOnly; SameSite=Lax; Path=/; Max-Age=2592000"
        );
    }

    #[test]
    fn test_clear_cookie_zeroes_max_age() {
        let cookie = clear_cookie(REDIRECT_COOKIE, true);
        assert_eq!(
            cookie,
            "oauth_redirect=; HttpOnly; SameSite=None; Secure; Path=/; Max-Age=0"
        );
    }
}
