//! Auth Router
//!
//! The authorization policy lives here, route by route: public routes
//! carry no guard layer, guarded routes are layered with exactly one of
//! the two guard middlewares.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::tokens::TokenIssuer;
use crate::domain::repository::{MailDispatcher, SessionStore, TokenStore, UserDirectory};
use crate::infra::mail_queue::RedisMailQueue;
use crate::infra::postgres::PgUserDirectory;
use crate::infra::redis::RedisCache;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{self, GuardState};

/// Create the auth router backed by Postgres and Redis
pub fn auth_router(
    directory: PgUserDirectory,
    cache: RedisCache,
    mailer: RedisMailQueue,
    signer: TokenSigner,
    config: AuthConfig,
) -> Router {
    auth_router_generic(directory, cache, mailer, signer, config)
}

/// Create the auth router for any collaborator implementations
pub fn auth_router_generic<D, C, M>(
    directory: D,
    cache: C,
    mailer: M,
    signer: TokenSigner,
    config: AuthConfig,
) -> Router
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let directory = Arc::new(directory);
    let cache = Arc::new(cache);
    let mailer = Arc::new(mailer);
    let signer = Arc::new(signer);
    let config = Arc::new(config);
    let tokens = Arc::new(TokenIssuer::new(
        cache.clone(),
        signer.clone(),
        config.clone(),
    ));

    let state = AuthAppState {
        directory,
        cache: cache.clone(),
        mailer,
        signer: signer.clone(),
        tokens,
        config,
    };

    let guard = GuardState { cache, signer };

    // Guarded routes: valid token required, unverified accounts allowed
    let guarded = Router::new()
        .route(
            "/verification",
            get(handlers::request_verification::<D, C, M>),
        )
        .route("/logout", post(handlers::log_out::<D, C, M>))
        .route_layer(axum_middleware::from_fn_with_state(
            guard,
            middleware::allow_unverified::<C>,
        ))
        .with_state(state.clone());

    // Public routes
    Router::new()
        .route("/signup", post(handlers::sign_up::<D, C, M>))
        .route("/signin", post(handlers::sign_in::<D, C, M>))
        .route("/google/sign-in", post(handlers::google_sign_on::<D, C, M>))
        .route(
            "/verify-with-email",
            get(handlers::get_verification_mail::<D, C, M>),
        )
        .route("/verify-email", get(handlers::verify_email::<D, C, M>))
        .route("/access-token", get(handlers::access_token::<D, C, M>))
        .route(
            "/forgot-password",
            post(handlers::forgot_password::<D, C, M>),
        )
        .route("/reset-password", post(handlers::reset_password::<D, C, M>))
        .with_state(state)
        .merge(guarded)
}
