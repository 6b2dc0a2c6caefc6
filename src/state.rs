use std::sync::Arc;

use sqlx::PgPool;

use modart_config::{CorsConfig, EmailConfig, JwtConfig, RateLimitConfig};

use crate::middleware::rate_limit::{LoginRateLimiter, login_rate_limiter};
use crate::store::AccountStore;
use crate::utils::email::Mailer;

/// Shared application state. Every collaborator is constructed once at
/// startup and injected here.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub accounts: Arc<dyn AccountStore>,
    pub mailer: Arc<dyn Mailer>,
    pub login_limiter: Arc<LoginRateLimiter>,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

impl AppState {
    pub fn new(
        db: PgPool,
        accounts: Arc<dyn AccountStore>,
        mailer: Arc<dyn Mailer>,
        jwt_config: JwtConfig,
        email_config: EmailConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        Self {
            db,
            accounts,
            mailer,
            login_limiter: Arc::new(login_rate_limiter(&rate_limit_config)),
            jwt_config,
            email_config,
            cors_config,
            rate_limit_config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .finish_non_exhaustive()
    }
}
