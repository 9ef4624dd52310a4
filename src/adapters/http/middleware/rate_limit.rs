//! Rate limiting middleware for axum.
//!
//! Scopes are checked in order, stopping at the first denial:
//! 1. Global (infrastructure protection)
//! 2. Per-IP
//! 3. Per-user, when `auth_middleware` has already attached a principal
//!
//! Responses carry `x-ratelimit-limit`, `x-ratelimit-remaining` and
//! `x-ratelimit-reset`. A 429 also carries `Retry-After`.
//!
//! The limiter failing open is intentional: an unavailable counter store
//! must not take the payment endpoints down with it.
//!
//! `X-Forwarded-For` and `X-Real-IP` are client-controlled. They are only
//! read when the service sits behind a proxy that overwrites them; otherwise
//! the per-IP key is the socket peer.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::ports::{RateLimitDenied, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

/// Rate limiter middleware state.
#[derive(Clone)]
pub struct RateLimiterState {
    pub limiter: Arc<dyn RateLimiter>,
    /// Read the client address from proxy headers instead of the socket.
    pub trust_forwarded_headers: bool,
}

impl RateLimiterState {
    pub fn new(limiter: Arc<dyn RateLimiter>, trust_forwarded_headers: bool) -> Self {
        Self {
            limiter,
            trust_forwarded_headers,
        }
    }
}

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimiterState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(
        request.headers(),
        connect_info.as_ref(),
        state.trust_forwarded_headers,
    );
    let user = request.extensions().get::<AuthenticatedUser>().cloned();

    let mut keys = vec![RateLimitKey::global()];
    if let Some(ip) = &client_ip {
        keys.push(RateLimitKey::ip(ip));
    }
    if let Some(user) = &user {
        keys.push(RateLimitKey::user(&user.id));
    }

    // Headers report the most specific scope that was counted.
    let mut reported: Option<RateLimitStatus> = None;

    for key in keys {
        match state.limiter.check(key.clone()).await {
            Ok(RateLimitResult::Allowed(status)) => reported = Some(status),
            Ok(RateLimitResult::Denied(denied)) => {
                tracing::warn!(
                    scope = %denied.scope,
                    key = %key.storage_key(),
                    limit = denied.limit,
                    retry_after_secs = denied.retry_after_secs,
                    path = %request.uri().path(),
                    "Rate limit exceeded"
                );
                return rate_limit_response(&denied);
            }
            Err(e) => {
                tracing::warn!(scope = %key.scope, error = %e, "Rate limiter unavailable, allowing request");
            }
        }
    }

    let mut response = next.run(request).await;

    if let Some(status) = reported {
        add_rate_limit_headers(
            response.headers_mut(),
            status.limit,
            status.remaining,
            status.reset_at.as_unix_secs(),
        );
    }

    response
}

/// Client address for the per-IP scope.
///
/// With `trust_forwarded_headers`, order of precedence is:
/// 1. `X-Forwarded-For` (first entry)
/// 2. `X-Real-IP`
/// 3. Socket peer address
///
/// Without it only the socket peer address is used.
fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_forwarded_headers: bool,
) -> Option<String> {
    let peer = connect_info.map(|ci| ci.0.ip().to_string());
    if !trust_forwarded_headers {
        return peer;
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = real_ip {
        return Some(ip.to_string());
    }

    peer
}

fn rate_limit_response(denied: &RateLimitDenied) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(serde_json::json!({ "error": "Too many requests. Please try again later." })),
    )
        .into_response();

    let reset_at = Timestamp::now().as_unix_secs() + u64::from(denied.retry_after_secs);
    let headers = response.headers_mut();
    add_rate_limit_headers(headers, denied.limit, 0, reset_at);
    headers.insert(RETRY_AFTER, HeaderValue::from(denied.retry_after_secs));

    response
}

fn add_rate_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset_at: u64) {
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(limit));
    headers.insert(
        headers::X_RATELIMIT_REMAINING.clone(),
        HeaderValue::from(remaining),
    );
    headers.insert(headers::X_RATELIMIT_RESET.clone(), HeaderValue::from(reset_at));
}
