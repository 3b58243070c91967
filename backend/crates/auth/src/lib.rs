//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, collaborator traits
//! - `application/` - Use cases and application services
//! - `infra/` - Postgres user directory, Redis cache, mail queue
//! - `presentation/` - HTTP handlers, DTOs, router, guard middleware
//!
//! ## Features
//! - User signup with email verification
//! - Password sign-in and Google sign-on
//! - Short-lived access / long-lived refresh tokens (JWT)
//! - Redis-backed sessions and single-use verify/reset tokens
//! - Password reset over email
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Tokens valid only while byte-equal to the cached copy, so issuing a
//!   new token (or logging out) revokes the previous one before its
//!   natural expiry
//! - OAuth-only accounts can never authenticate with a password

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::mail_queue::RedisMailQueue;
pub use infra::postgres::PgUserDirectory;
pub use infra::redis::RedisCache;
pub use platform::token::TokenSigner;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
