//! HTTP Handlers

use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::google_sign_on::{GoogleSignOnInput, GoogleSignOnUseCase};
use crate::application::password_reset::{ForgotPasswordUseCase, ResetPasswordUseCase};
use crate::application::refresh::{GetAccessTokenUseCase, LogOutUseCase};
use crate::application::sign_in::{SignInInput, SignInUseCase};
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::application::tokens::TokenIssuer;
use crate::application::verify_email::{GetVerificationMailUseCase, VerifyEmailUseCase};
use crate::domain::entity::Session;
use crate::domain::repository::{MailDispatcher, SessionStore, TokenStore, UserDirectory};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, EmailQuery, ForgotPasswordRequest, GoogleSignOnRequest, MessageResponse,
    ResetPasswordRequest, SignInRequest, SignInResponse, SignUpRequest, TokenQuery,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<D, C, M>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    pub directory: Arc<D>,
    pub cache: Arc<C>,
    pub mailer: Arc<M>,
    pub signer: Arc<TokenSigner>,
    pub tokens: Arc<TokenIssuer<C>>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<MessageResponse>)>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.directory.clone(),
        state.cache.clone(),
        state.tokens.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let input = SignUpInput {
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        password: req.password,
    };

    use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Signup successful, please check your email to verify your account",
        )),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<SignInResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.directory.clone(),
        state.cache.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(SignInResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        user: output.session.into(),
    }))
}

// ============================================================================
// Google Sign-On
// ============================================================================

/// POST /api/auth/google/sign-in
pub async fn google_sign_on<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Json(req): Json<GoogleSignOnRequest>,
) -> AuthResult<Json<SignInResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = GoogleSignOnUseCase::new(
        state.directory.clone(),
        state.cache.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let input = GoogleSignOnInput {
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
    };

    let output = use_case.execute(input).await?;

    Ok(Json(SignInResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        user: output.session.into(),
    }))
}

// ============================================================================
// Email Verification
// ============================================================================

/// GET /api/auth/verify-with-email?email=
pub async fn get_verification_mail<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Query(query): Query<EmailQuery>,
) -> AuthResult<Json<MessageResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = GetVerificationMailUseCase::new(
        state.directory.clone(),
        state.tokens.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&query.email).await?;

    Ok(Json(MessageResponse::new(
        "Verification email sent, please check your inbox",
    )))
}

/// GET /api/auth/verification (guarded, unverified allowed)
///
/// Re-sends the verification mail to the signed-in account.
pub async fn request_verification<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Extension(session): Extension<Session>,
) -> AuthResult<Json<MessageResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = GetVerificationMailUseCase::new(
        state.directory.clone(),
        state.tokens.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(session.email.as_str()).await?;

    Ok(Json(MessageResponse::new(
        "Verification email sent, please check your inbox",
    )))
}

/// GET /api/auth/verify-email?token=
///
/// Target of the emailed link; always answers with a redirect.
pub async fn verify_email<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Query(query): Query<TokenQuery>,
) -> Redirect
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(
        state.directory.clone(),
        state.cache.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    let target = use_case.execute(&query.token).await;

    Redirect::to(&target)
}

// ============================================================================
// Token Refresh / Logout
// ============================================================================

/// GET /api/auth/access-token?token=
pub async fn access_token<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Query(query): Query<TokenQuery>,
) -> AuthResult<Json<AccessTokenResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = GetAccessTokenUseCase::new(
        state.cache.clone(),
        state.tokens.clone(),
        state.signer.clone(),
    );

    let access_token = use_case.execute(&query.token).await?;

    Ok(Json(AccessTokenResponse { access_token }))
}

/// POST /api/auth/logout?token= (guarded, unverified allowed)
pub async fn log_out<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Query(query): Query<TokenQuery>,
) -> AuthResult<Json<MessageResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = LogOutUseCase::new(state.cache.clone(), state.signer.clone());

    use_case.execute(&query.token).await?;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    let use_case = ForgotPasswordUseCase::new(
        state.directory.clone(),
        state.tokens.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.email).await?;

    Ok(Json(MessageResponse::new(
        "Password reset email sent, please check your inbox",
    )))
}

/// POST /api/auth/reset-password
pub async fn reset_password<D, C, M>(
    State(state): State<AuthAppState<D, C, M>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    D: UserDirectory + Clone + Send + Sync + 'static,
    C: SessionStore + TokenStore + Clone + Send + Sync + 'static,
    M: MailDispatcher + Clone + Send + Sync + 'static,
{
    if req.password != req.confirm_password {
        return Err(AuthError::Validation("Passwords do not match".to_string()));
    }

    let use_case = ResetPasswordUseCase::new(
        state.directory.clone(),
        state.cache.clone(),
        state.signer.clone(),
        state.config.clone(),
    );

    use_case.execute(&req.token, req.password).await?;

    Ok(Json(MessageResponse::new("Password reset successfully")))
}
