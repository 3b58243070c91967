//! Request Authorization Guard
//!
//! Validates the bearer token on guarded routes and stores the loaded
//! `Session` in request extensions for handlers. Each guarded route is
//! layered with exactly one policy; public routes carry no guard at all,
//! which keeps the policy visible in the router instead of hidden in
//! handler metadata.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::check_access::{AccessPolicy, CheckAccessUseCase};
use crate::domain::repository::{SessionStore, TokenStore};

/// Guard state
#[derive(Clone)]
pub struct GuardState<C>
where
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
{
    pub cache: Arc<C>,
    pub signer: Arc<TokenSigner>,
}

/// Guard requiring a valid token and a verified account
pub async fn require_verified<C>(
    State(state): State<GuardState<C>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
{
    run_guard(state, AccessPolicy::RequireVerified, req, next).await
}

/// Guard requiring a valid token, verified or not
pub async fn allow_unverified<C>(
    State(state): State<GuardState<C>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
{
    run_guard(state, AccessPolicy::AllowUnverified, req, next).await
}

async fn run_guard<C>(
    state: GuardState<C>,
    policy: AccessPolicy,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
{
    let token = bearer_token(&req);

    let use_case = CheckAccessUseCase::new(state.cache.clone(), state.signer.clone());

    match use_case.execute(token.as_deref(), policy).await {
        Ok(Some(session)) => {
            req.extensions_mut().insert(session);
            Ok(next.run(req).await)
        }
        Ok(None) => Ok(next.run(req).await),
        Err(e) => Err(e.into_response()),
    }
}

/// Extract the bearer token from the Authorization header
fn bearer_token(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
