//! Token Refresh and Logout Use Cases
//!
//! Both take the refresh token and gate on the cached copy. Refresh
//! mints a new access token without rotating the refresh token; logout
//! clears both token slots so neither survives to its natural expiry.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::tokens::TokenIssuer;
use crate::domain::repository::TokenStore;
use crate::domain::value_object::{TokenKind, UserId};
use crate::error::{AuthError, AuthResult};

/// Access token refresh use case
pub struct GetAccessTokenUseCase<C>
where
    C: TokenStore,
{
    cache: Arc<C>,
    tokens: Arc<TokenIssuer<C>>,
    signer: Arc<TokenSigner>,
}

impl<C> GetAccessTokenUseCase<C>
where
    C: TokenStore,
{
    pub fn new(cache: Arc<C>, tokens: Arc<TokenIssuer<C>>, signer: Arc<TokenSigner>) -> Self {
        Self {
            cache,
            tokens,
            signer,
        }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<String> {
        let user_id = require_live_refresh_token(&*self.cache, &self.signer, refresh_token).await?;

        let access_token = self.tokens.issue(TokenKind::Access, &user_id).await?;

        tracing::debug!(user_id = %user_id, "Access token refreshed");

        Ok(access_token)
    }
}

/// Logout use case
pub struct LogOutUseCase<C>
where
    C: TokenStore,
{
    cache: Arc<C>,
    signer: Arc<TokenSigner>,
}

impl<C> LogOutUseCase<C>
where
    C: TokenStore,
{
    pub fn new(cache: Arc<C>, signer: Arc<TokenSigner>) -> Self {
        Self { cache, signer }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<()> {
        let user_id = require_live_refresh_token(&*self.cache, &self.signer, refresh_token).await?;

        // Both slots go; neither token survives to its signed expiry
        self.cache.delete_token(TokenKind::Refresh, &user_id).await?;
        self.cache.delete_token(TokenKind::Access, &user_id).await?;

        tracing::info!(user_id = %user_id, "User logged out");

        Ok(())
    }
}

/// Verify a refresh token's signature and byte-equality with the cached
/// copy, returning the subject user id
async fn require_live_refresh_token<C: TokenStore>(
    cache: &C,
    signer: &TokenSigner,
    refresh_token: &str,
) -> AuthResult<UserId> {
    let claims = signer.verify(refresh_token)?;
    let user_id: UserId = claims
        .sub
        .parse()
        .map_err(|_| AuthError::InvalidOrExpiredToken)?;

    let stored = cache.get_token(TokenKind::Refresh, &user_id).await?;
    if stored.as_deref() != Some(refresh_token) {
        return Err(AuthError::InvalidOrExpiredToken);
    }

    Ok(user_id)
}
