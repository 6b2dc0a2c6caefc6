use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use modart::logging::init_tracing;
use modart::middleware::rate_limit::spawn_limiter_pruning;
use modart::router::init_router;
use modart::state::AppState;
use modart::store::PgAccountStore;
use modart::utils::email::SmtpMailer;
use modart_config::{CorsConfig, EmailConfig, JwtConfig, RateLimitConfig, ServerConfig};
use modart_db::{init_db_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config.log_dir).context("Failed to create logs directory")?;

    let db = init_db_pool(
        &server_config.database_url,
        server_config.database_max_connections,
    )
    .await
    .context("Failed to connect to database")?;
    run_migrations(&db)
        .await
        .context("Failed to run database migrations")?;

    let jwt_config = JwtConfig::from_env();
    if jwt_config.secret.is_empty() {
        warn!("JWT_SECRET is not set; token issuance will fail");
    }

    let email_config = EmailConfig::from_env();
    let mailer = SmtpMailer::new(email_config.clone());
    mailer.verify_connection().await;

    let rate_limit_config = RateLimitConfig::from_env();
    if rate_limit_config.trust_proxy_headers {
        info!("Login rate limiting keys on forwarded client addresses");
    }
    let prune_interval = rate_limit_config.prune_interval();

    let state = AppState::new(
        db.clone(),
        Arc::new(PgAccountStore::new(db)),
        Arc::new(mailer),
        jwt_config,
        email_config,
        CorsConfig::from_env(),
        rate_limit_config,
    );
    spawn_limiter_pruning(state.login_limiter.clone(), prune_interval);
    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "Server running");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
