//! Repository Traits
//!
//! Contracts between the application layer and infrastructure. The use
//! cases only ever see these traits; Postgres and Redis adapters live in
//! `infra` and tests substitute in-memory fakes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Session, User};
use crate::domain::value_object::{Email, TokenKind, UserId};
use crate::error::AuthResult;

// ============================================================================
// User Directory
// ============================================================================

/// Persistent store of user records
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    /// Insert a new user. Fails with `EmailAlreadyExists` when the email
    /// is already taken.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Look up a user by id
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Look up a user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Set the verified flag
    async fn set_verified(&self, user_id: &UserId, verified: bool) -> AuthResult<()>;

    /// Replace the stored password hash
    async fn set_password(&self, user_id: &UserId, password_hash: &str) -> AuthResult<()>;

    /// Find-or-create for Google sign-on. Existing accounts keep their
    /// record; new accounts are created verified and passwordless.
    async fn upsert_oauth_user(
        &self,
        email: &Email,
        first_name: &str,
        last_name: &str,
    ) -> AuthResult<User>;
}

// ============================================================================
// Session Store
// ============================================================================

/// TTL cache of session snapshots, keyed by bare user id
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Store (or overwrite) the session for its user
    async fn put_session(&self, session: &Session, ttl: Duration) -> AuthResult<()>;

    /// Fetch the session for a user, if one is live
    async fn get_session(&self, user_id: &UserId) -> AuthResult<Option<Session>>;

    /// Drop the session for a user
    async fn delete_session(&self, user_id: &UserId) -> AuthResult<()>;
}

// ============================================================================
// Token Store
// ============================================================================

/// TTL cache of the single live token per `(kind, user)` slot
///
/// Writing a slot revokes whatever token was there before; a signed
/// token that no longer byte-matches its slot is dead.
#[trait_variant::make(TokenStore: Send)]
pub trait LocalTokenStore {
    /// Store (or overwrite) the live token for a slot
    async fn put_token(
        &self,
        kind: TokenKind,
        user_id: &UserId,
        token: &str,
        ttl: Duration,
    ) -> AuthResult<()>;

    /// Fetch the live token for a slot
    async fn get_token(&self, kind: TokenKind, user_id: &UserId) -> AuthResult<Option<String>>;

    /// Clear a slot
    async fn delete_token(&self, kind: TokenKind, user_id: &UserId) -> AuthResult<()>;
}

// ============================================================================
// Mail Dispatch
// ============================================================================

/// Outbound email handed to the mail worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

/// Hand-off point for outbound mail
///
/// Dispatch is best-effort: callers log failures and carry on, so a mail
/// outage never fails an auth operation.
#[trait_variant::make(MailDispatcher: Send)]
pub trait LocalMailDispatcher {
    /// Enqueue a message for delivery
    async fn enqueue(&self, message: EmailMessage) -> AuthResult<()>;
}
