//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{
    AuthConfig, PgUserDirectory, RedisCache, RedisMailQueue, TokenSigner, auth_router,
    infra::mail_queue::DEFAULT_MAIL_QUEUE_KEY,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Redis connection (sessions, tokens, mail queue)
    let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let redis_client = redis::Client::open(redis_url)?;
    let redis_conn = ConnectionManager::new(redis_client).await?;

    tracing::info!("Connected to redis");

    let config = auth_config_from_env()?;
    let signer = TokenSigner::new(&config.signing_secret);

    let directory = PgUserDirectory::new(pool);
    let cache = RedisCache::new(redis_conn.clone());
    let mail_queue_key =
        env::var("MAIL_QUEUE_KEY").unwrap_or_else(|_| DEFAULT_MAIL_QUEUE_KEY.to_string());
    let mailer = RedisMailQueue::new(redis_conn, mail_queue_key);

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest(
            "/api/auth",
            auth_router(directory, cache, mailer, signer, config),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Build the auth configuration from the environment
fn auth_config_from_env() -> anyhow::Result<AuthConfig> {
    let mut config = if cfg!(debug_assertions) && env::var("JWT_SECRET").is_err() {
        AuthConfig::development()
    } else {
        let secret_b64 = env::var("JWT_SECRET").expect("JWT_SECRET must be set in production");
        let signing_secret = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        AuthConfig {
            signing_secret,
            ..AuthConfig::default()
        }
    };

    if let Ok(url) = env::var("FRONTEND_URL") {
        config.frontend_url = url;
    }
    if let Ok(url) = env::var("API_URL") {
        config.api_url = url;
    }

    config.access_token_ttl = env_secs("ACCESS_TOKEN_TTL_SECS", config.access_token_ttl);
    config.refresh_token_ttl = env_secs("REFRESH_TOKEN_TTL_SECS", config.refresh_token_ttl);
    config.one_time_token_ttl = env_secs("ONE_TIME_TOKEN_TTL_SECS", config.one_time_token_ttl);
    config.session_ttl = env_secs("SESSION_TTL_SECS", config.session_ttl);

    Ok(config)
}

fn env_secs(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
