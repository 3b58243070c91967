//! Access Check Use Case
//!
//! Backs the request guard: validates a presented bearer token against
//! the live `access-<id>` slot and loads the session it names. Each
//! route carries an explicit policy; there is no implicit default pulled
//! from handler metadata.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::domain::entity::Session;
use crate::domain::repository::{SessionStore, TokenStore};
use crate::domain::value_object::{TokenKind, UserId};
use crate::error::{AuthError, AuthResult};

/// Authorization policy attached to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No token required
    Public,
    /// Valid token required; unverified accounts allowed
    AllowUnverified,
    /// Valid token and a verified account required
    RequireVerified,
}

/// Access check use case
pub struct CheckAccessUseCase<C>
where
    C: SessionStore + TokenStore,
{
    cache: Arc<C>,
    signer: Arc<TokenSigner>,
}

impl<C> CheckAccessUseCase<C>
where
    C: SessionStore + TokenStore,
{
    pub fn new(cache: Arc<C>, signer: Arc<TokenSigner>) -> Self {
        Self { cache, signer }
    }

    /// Validate a bearer token under the given policy
    ///
    /// Returns the session for authenticated requests, `None` for public
    /// routes. Cache failures propagate; authorization must not degrade
    /// open when the token state cannot be read.
    pub async fn execute(
        &self,
        bearer_token: Option<&str>,
        policy: AccessPolicy,
    ) -> AuthResult<Option<Session>> {
        if policy == AccessPolicy::Public {
            return Ok(None);
        }

        let token = bearer_token.ok_or(AuthError::Unauthorized)?;

        let claims = self
            .signer
            .verify(token)
            .map_err(|_| AuthError::Unauthorized)?;
        let user_id: UserId = claims.sub.parse().map_err(|_| AuthError::Unauthorized)?;

        // Signature validity is not enough: the token must still be the
        // live one in its slot, or it was revoked or superseded.
        let stored = self.cache.get_token(TokenKind::Access, &user_id).await?;
        if stored.as_deref() != Some(token) {
            return Err(AuthError::Unauthorized);
        }

        let session = self
            .cache
            .get_session(&user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if policy == AccessPolicy::RequireVerified && !session.verified {
            return Err(AuthError::Forbidden);
        }

        Ok(Some(session))
    }
}
