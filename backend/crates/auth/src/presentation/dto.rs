//! Data Transfer Objects
//!
//! Request/response types for the HTTP API. Field names are camelCase
//! on the wire.

use serde::{Deserialize, Serialize};

use crate::domain::entity::Session;

// ============================================================================
// Requests
// ============================================================================

/// Sign up request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Sign in request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Google sign-on request: profile fields asserted by the completed
/// OAuth exchange
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignOnRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Forgot password request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset password request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query string carrying a token (verify-email, access-token, logout)
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// Query string carrying an email (verify-with-email)
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Session snapshot returned to the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub verified: bool,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            id: session.id.to_string(),
            first_name: session.first_name,
            last_name: session.last_name,
            email: session.email.to_string(),
            verified: session.verified,
        }
    }
}

/// Sign in / sign-on response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionDto,
}

/// Fresh access token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Plain message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
