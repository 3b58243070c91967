//! Token Kind Value Object
//!
//! The four token kinds share one signed-claims shape and are told apart
//! by the cache key namespace they are stored under, `<kind>-<user-id>`.
//! Typed keys keep the token namespaces and the session namespace (plain
//! user id) from ever colliding.

use std::fmt;

use crate::domain::value_object::UserId;

/// Kind of issued token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived token for protected endpoints
    Access,
    /// Long-lived token used to mint new access tokens
    Refresh,
    /// One-time email verification token
    Verify,
    /// One-time password reset token
    Reset,
}

impl TokenKind {
    /// Cache key prefix for this kind
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::Verify => "verify",
            TokenKind::Reset => "reset",
        }
    }

    /// Cache key holding the currently-live token of this kind for a user
    pub fn cache_key(&self, user_id: &UserId) -> String {
        format!("{}-{}", self.as_str(), user_id)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_namespaces() {
        let id = UserId::new();
        assert_eq!(TokenKind::Access.cache_key(&id), format!("access-{}", id));
        assert_eq!(TokenKind::Refresh.cache_key(&id), format!("refresh-{}", id));
        assert_eq!(TokenKind::Verify.cache_key(&id), format!("verify-{}", id));
        assert_eq!(TokenKind::Reset.cache_key(&id), format!("reset-{}", id));
    }

    #[test]
    fn test_token_key_never_collides_with_session_key() {
        // Session entries are keyed by the bare user id
        let id = UserId::new();
        assert_ne!(TokenKind::Access.cache_key(&id), id.to_string());
    }
}
