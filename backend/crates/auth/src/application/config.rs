//! Application Configuration
//!
//! Configuration for the auth application layer: token lifetimes,
//! signing secret, hashing cost, and the URLs baked into outbound mail.

use std::time::Duration;

use platform::password::HashCost;

use crate::domain::value_object::TokenKind;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for signing tokens
    pub signing_secret: Vec<u8>,
    /// Access token TTL (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (1 week)
    pub refresh_token_ttl: Duration,
    /// Verify / reset token TTL (1 hour)
    pub one_time_token_ttl: Duration,
    /// Session TTL (1 week, matches the refresh window)
    pub session_ttl: Duration,
    /// Frontend base URL, for reset links and verification redirects
    pub frontend_url: String,
    /// API base URL, for verification links
    pub api_url: String,
    /// Argon2id cost parameters
    pub hash_cost: HashCost,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            one_time_token_ttl: Duration::from_secs(3600),
            session_ttl: Duration::from_secs(7 * 24 * 3600),
            frontend_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:8080/api".to_string(),
            hash_cost: HashCost::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self {
            signing_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (fast hashing)
    pub fn development() -> Self {
        Self {
            hash_cost: HashCost::fast(),
            ..Self::with_random_secret()
        }
    }

    /// TTL for a token of the given kind
    pub fn token_ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_token_ttl,
            TokenKind::Refresh => self.refresh_token_ttl,
            TokenKind::Verify | TokenKind::Reset => self.one_time_token_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ttls() {
        let config = AuthConfig::default();
        assert_eq!(
            config.token_ttl(TokenKind::Access),
            Duration::from_secs(900)
        );
        assert_eq!(
            config.token_ttl(TokenKind::Refresh),
            Duration::from_secs(7 * 24 * 3600)
        );
        assert_eq!(
            config.token_ttl(TokenKind::Verify),
            config.token_ttl(TokenKind::Reset)
        );
    }

    #[test]
    fn test_random_secret_is_nonempty() {
        let config = AuthConfig::with_random_secret();
        assert_eq!(config.signing_secret.len(), 32);
        assert_ne!(config.signing_secret, vec![0u8; 32]);
    }
}
