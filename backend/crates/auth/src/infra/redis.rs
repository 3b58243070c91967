//! Redis Session and Token Cache
//!
//! One Redis database backs both typed views: sessions as JSON under the
//! bare user id, tokens as plain strings under `<kind>-<id>`. TTLs ride
//! on the keys via `SET ... EX`, so expiry needs no sweeper.

use std::time::Duration;

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::entity::Session;
use crate::domain::repository::{SessionStore, TokenStore};
use crate::domain::value_object::{TokenKind, UserId};
use crate::error::{AuthError, AuthResult};

/// Redis-backed session/token cache
///
/// `ConnectionManager` multiplexes one connection and reconnects on
/// failure; cloning it is cheap and shares the underlying connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

impl SessionStore for RedisCache {
    async fn put_session(&self, session: &Session, ttl: Duration) -> AuthResult<()> {
        let value = serde_json::to_string(session)
            .map_err(|e| AuthError::Internal(format!("Session serialization failed: {}", e)))?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(session.cache_key(), value, ttl.as_secs())
            .await?;

        Ok(())
    }

    async fn get_session(&self, user_id: &UserId) -> AuthResult<Option<Session>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(user_id.to_string()).await?;

        match value {
            Some(json) => {
                let session = serde_json::from_str(&json).map_err(|e| {
                    AuthError::Internal(format!("Session deserialization failed: {}", e))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, user_id: &UserId) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(user_id.to_string()).await?;

        Ok(())
    }
}

impl TokenStore for RedisCache {
    async fn put_token(
        &self,
        kind: TokenKind,
        user_id: &UserId,
        token: &str,
        ttl: Duration,
    ) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(kind.cache_key(user_id), token, ttl.as_secs())
            .await?;

        Ok(())
    }

    async fn get_token(&self, kind: TokenKind, user_id: &UserId) -> AuthResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(kind.cache_key(user_id)).await?;

        Ok(value)
    }

    async fn delete_token(&self, kind: TokenKind, user_id: &UserId) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(kind.cache_key(user_id)).await?;

        Ok(())
    }
}
