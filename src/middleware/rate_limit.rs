//! Per-client login rate limiting.
//!
//! Clients are keyed by the socket peer address. Behind a trusted reverse
//! proxy (`TRUST_PROXY_HEADERS`), the first `X-Forwarded-For` entry and then
//! `X-Real-IP` take precedence. Requests with no resolvable address share a
//! single bucket.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use modart_config::RateLimitConfig;
use modart_core::AppError;

use crate::state::AppState;

pub type LoginRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

pub fn login_rate_limiter(config: &RateLimitConfig) -> LoginRateLimiter {
    RateLimiter::keyed(config.login_quota())
}

/// Resolves the client address used as the limiter key.
///
/// Forwarded-address headers are only read when `trust_proxy_headers` is
/// set; otherwise any client could pick its own key.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy_headers: bool,
) -> Option<IpAddr> {
    if !trust_proxy_headers {
        return peer.map(|addr| addr.ip());
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<IpAddr>().ok())
        })
        .or_else(|| peer.map(|addr| addr.ip()))
}

/// Periodically drops buckets of clients that have fully recovered, so the
/// limiter does not grow with every address it has ever seen.
pub fn spawn_limiter_pruning(limiter: Arc<LoginRateLimiter>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
            debug!(tracked_clients = limiter.len(), "Pruned login rate limiter");
        }
    })
}

/// Rejects login attempts beyond the configured quota with 429.
pub async fn limit_login_attempts(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let config = &state.rate_limit_config;
    let ip = client_ip(req.headers(), peer, config.trust_proxy_headers)
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if state.login_limiter.check_key(&ip).is_err() {
        warn!(client_ip = %ip, "Login rate limit exceeded");
        let minutes = config.login_window_secs.div_ceil(60);
        let mut response = AppError::too_many_requests(format!(
            "Too many login attempts, please try again in {} minutes",
            minutes
        ))
        .into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(config.retry_after_secs()));
        return response;
    }

    next.run(req).await
}
