//! Signed Token Issuance and Verification
//!
//! Tamper-evident, expiring tokens carrying a small claims payload
//! (HS256 JWT). The signing key is process-wide configuration loaded once
//! at startup; the signer holds no mutable state after construction.
//!
//! Every decode failure (bad signature, malformed token, past expiry)
//! collapses into a single [`TokenError::InvalidOrExpired`] so callers
//! cannot distinguish why a presented token was rejected.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature invalid, token malformed, or expiry passed
    #[error("Invalid or expired token")]
    InvalidOrExpired,

    /// Signing failed (should not happen with a valid key)
    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Claims payload embedded in every token
///
/// `sub` carries the session/user id; `exp` is the Unix expiry timestamp
/// derived from the TTL at signing time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// HS256 token signer
///
/// Cheap to construct, but intended to be built once from configuration
/// and shared behind an `Arc`.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Create a signer from the process-wide signing secret
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: an expired token is expired
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a token for `subject` expiring after `ttl`
    pub fn sign(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: Utc::now().timestamp() + ttl.as_secs() as i64,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::InvalidOrExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";

    #[test]
    fn test_sign_and_verify() {
        let signer = TokenSigner::new(SECRET);
        let token = signer.sign("user-1", Duration::from_secs(60)).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let signer = TokenSigner::new(SECRET);
        let other = TokenSigner::new(b"different-secret");

        let token = signer.sign("user-1", Duration::from_secs(60)).unwrap();
        assert!(matches!(
            other.verify(&token),
            Err(TokenError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_malformed_token() {
        let signer = TokenSigner::new(SECRET);
        assert!(matches!(
            signer.verify("not.a.jwt"),
            Err(TokenError::InvalidOrExpired)
        ));
        assert!(matches!(
            signer.verify(""),
            Err(TokenError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let signer = TokenSigner::new(SECRET);

        // Encode an already-expired payload with the same key
        let claims = Claims {
            sub: "user-1".to_string(),
            exp: Utc::now().timestamp() - 120,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            signer.verify(&token),
            Err(TokenError::InvalidOrExpired)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let signer = TokenSigner::new(SECRET);
        let token = signer.sign("user-1", Duration::from_secs(60)).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(signer.verify(&tampered).is_err());
    }
}
