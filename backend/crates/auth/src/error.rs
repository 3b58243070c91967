//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad email/password on sign-in. Deliberately vague: this path never
    /// discloses whether the account exists.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Signup with an email that is already registered
    #[error("Email already exists, please use another email address")]
    EmailAlreadyExists,

    /// Operations keyed by email where the account must already exist
    #[error("Email does not exist, please sign up to get started")]
    UserNotFound,

    /// Password sign-in attempted against a Google sign-on account
    #[error("This account was created using Google sign-on, please sign in with Google")]
    GoogleSignOnAccount,

    /// Password reset attempted for an account with no password
    #[error("You can't update your password, this account was created using Google sign-on")]
    OauthAccountNoPassword,

    /// Malformed signature, expired token, or token superseded/missing
    /// from cache. Deliberately not distinguished to the caller.
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    /// Guard rejection: missing or unverifiable authorization details
    #[error("We could not verify your authorization details")]
    Unauthorized,

    /// Guard rejection: route requires a verified email
    #[error("Please verify your email address to proceed")]
    Forbidden,

    /// Input validation failure (email format, password policy)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transient cache failure; session/token state is safety-critical,
    /// so this propagates instead of being swallowed
    #[error("Session cache unavailable: {0}")]
    CacheUnavailable(#[from] redis::RedisError),

    /// Transient user directory failure
    #[error("User directory unavailable: {0}")]
    DirectoryUnavailable(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::GoogleSignOnAccount
            | AuthError::InvalidOrExpiredToken
            | AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::OauthAccountNoPassword | AuthError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::CacheUnavailable(_) | AuthError::DirectoryUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::GoogleSignOnAccount
            | AuthError::InvalidOrExpiredToken
            | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::EmailAlreadyExists => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::OauthAccountNoPassword | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::CacheUnavailable(_) | AuthError::DirectoryUnavailable(_) => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::CacheUnavailable(e) => {
                tracing::error!(error = %e, "Session cache error");
            }
            AuthError::DirectoryUnavailable(e) => {
                tracing::error!(error = %e, "User directory error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidOrExpiredToken => {
                tracing::warn!("Rejected token presentation");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::token::TokenError> for AuthError {
    fn from(err: platform::token::TokenError) -> Self {
        match err {
            platform::token::TokenError::InvalidOrExpired => AuthError::InvalidOrExpiredToken,
            platform::token::TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
