//! Request inspection helpers.
//!
//! # Responsibilities
//! - Request ID header name and lookup
//! - Resolve the client IP forwarded to the provider
//! - Resolve the host forwarded to the provider
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing (see server.rs layers)
//! - `X-Forwarded-For` is ignored unless explicitly trusted

use std::net::{IpAddr, SocketAddr};

use axum::http::{header, HeaderMap, HeaderName};

/// Correlation header set on every request and response.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Host reported when the request carries no usable `Host` header.
pub const DEFAULT_HOST: &str = "localhost";

/// The request ID assigned by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Client IP as seen by the provider.
///
/// With `trust_forwarded_for`, the left-most parseable `X-Forwarded-For`
/// entry wins; otherwise the socket peer is used.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> IpAddr {
    if trust_forwarded_for {
        let forwarded = headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').find_map(|ip| ip.trim().parse::<IpAddr>().ok()));
        if let Some(ip) = forwarded {
            return ip;
        }
    }
    peer.ip()
}

/// Inbound `Host` header, or [`DEFAULT_HOST`].
pub fn host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_HOST)
}
