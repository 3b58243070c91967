//! Token Issuance
//!
//! Signs tokens and records them in the token store. Each `(kind, user)`
//! slot holds exactly one live token; writing the slot revokes whatever
//! was there before, so a token's cache entry outliving its signature is
//! impossible (the cache TTL equals the signed expiry).

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::domain::repository::TokenStore;
use crate::domain::value_object::{TokenKind, UserId};
use crate::error::AuthResult;

/// Signs tokens and tracks the live copy per `(kind, user)` slot
pub struct TokenIssuer<C>
where
    C: TokenStore,
{
    cache: Arc<C>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<C> TokenIssuer<C>
where
    C: TokenStore,
{
    pub fn new(cache: Arc<C>, signer: Arc<TokenSigner>, config: Arc<AuthConfig>) -> Self {
        Self {
            cache,
            signer,
            config,
        }
    }

    /// Sign a fresh token for the user and make it the live one,
    /// revoking any predecessor in the same slot
    pub async fn issue(&self, kind: TokenKind, user_id: &UserId) -> AuthResult<String> {
        let ttl = self.config.token_ttl(kind);
        let token = self.signer.sign(&user_id.to_string(), ttl)?;

        self.cache.put_token(kind, user_id, &token, ttl).await?;

        tracing::debug!(kind = %kind, user_id = %user_id, "Issued token");

        Ok(token)
    }

    /// Issue a fresh access/refresh pair
    pub async fn issue_pair(&self, user_id: &UserId) -> AuthResult<(String, String)> {
        let access = self.issue(TokenKind::Access, user_id).await?;
        let refresh = self.issue(TokenKind::Refresh, user_id).await?;
        Ok((access, refresh))
    }
}
