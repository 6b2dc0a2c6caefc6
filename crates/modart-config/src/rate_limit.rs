//! Login rate limiting configuration.
//!
//! Login attempts are limited per client address with a token bucket: a
//! client may spend `login_max_attempts` attempts at once, and one attempt is
//! replenished every `login_window_secs / login_max_attempts` seconds, so a
//! client that exhausts its budget regains the full budget after one window.
//!
//! # Environment Variables
//!
//! - `LOGIN_RATE_LIMIT_MAX_ATTEMPTS`: attempts per window (default: 5)
//! - `LOGIN_RATE_LIMIT_WINDOW_SECS`: window length in seconds (default: 900)
//! - `TRUST_PROXY_HEADERS`: key clients on `X-Forwarded-For` / `X-Real-IP`
//!   instead of the socket peer (default: false). Only enable this behind a
//!   reverse proxy that overwrites those headers.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::Quota;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Attempts allowed per window.
    pub login_max_attempts: u32,
    /// Window length in seconds.
    pub login_window_secs: u64,
    /// Whether forwarded-address headers identify the client.
    pub trust_proxy_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_max_attempts: 5,
            login_window_secs: 15 * 60,
            trust_proxy_headers: false,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            login_max_attempts: std::env::var("LOGIN_RATE_LIMIT_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.login_max_attempts),
            login_window_secs: std::env::var("LOGIN_RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.login_window_secs),
            trust_proxy_headers: std::env::var("TRUST_PROXY_HEADERS")
                .ok()
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.trust_proxy_headers),
        }
    }

    /// Builds the governor quota for login attempts.
    ///
    /// Zero values are clamped to one attempt and one second.
    #[must_use]
    pub fn login_quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.login_max_attempts).unwrap_or(NonZeroU32::MIN);
        let window_ms = self.login_window_secs.max(1) * 1000;
        let period = Duration::from_millis((window_ms / u64::from(burst.get())).max(1));

        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }

    /// Seconds a blocked client should wait before its next attempt is
    /// replenished. Sent as `Retry-After` on 429 responses.
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        (self.login_window_secs.max(1) / u64::from(self.login_max_attempts.max(1))).max(1)
    }

    /// How often idle client buckets are dropped from the limiter.
    #[must_use]
    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.login_window_secs.clamp(60, 3600))
    }
}
