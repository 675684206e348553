//! Audit trail plumbing shared by the auth routes.
//!
//! Recording is strictly best-effort: losing an audit row is better than
//! failing a login, so [`record`] logs database errors and returns.

use std::net::SocketAddr;

use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;

use database::{audit_log, Database, NewAuditEvent};
use intercom_client::AdminProfile;

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Best-effort client address.
///
/// Behind Vercel the peer address is the proxy, so the forwarding headers
/// are checked first: the first hop of `x-forwarded-for`, then `x-real-ip`,
/// then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first_hop) = header_str(headers, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .filter(|hop| !hop.is_empty())
    {
        return first_hop.to_string();
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip").filter(|ip| !ip.is_empty()) {
        return real_ip.to_string();
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

fn user_agent(headers: &HeaderMap) -> String {
    header_str(headers, USER_AGENT.as_str())
        .filter(|agent| !agent.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Record an audit event without ever failing the request that raised it.
pub async fn record(
    db: &Database,
    action: &str,
    profile: Option<&AdminProfile>,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
) {
    let event = NewAuditEvent {
        user_id: profile.and_then(AdminProfile::id_string),
        user_name: profile.and_then(|p| p.name.clone()),
        user_email: profile.and_then(|p| p.email.clone()),
        action: action.to_string(),
        ip_address: client_ip(headers, peer),
        user_agent: user_agent(headers),
    };

    if let Err(err) = audit_log::record(db.pool(), &event).await {
        tracing::error!("Audit logging error: {}", err);
    }
}
