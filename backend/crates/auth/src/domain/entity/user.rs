//! User Entity
//!
//! Identity record owned by the user directory and referenced by the
//! authentication core. Created on signup or first Google sign-on;
//! mutated on verification and password reset; never deleted here.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{Email, UserId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Email address (unique)
    pub email: Email,
    /// Argon2id PHC hash string; `None` for OAuth-only accounts
    pub password: Option<String>,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Whether the email address has been verified
    pub verified: bool,
    /// Accounts created via Google sign-on must never be
    /// password-authenticated
    pub google_sign_on: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new password-based user (unverified)
    pub fn new(
        email: Email,
        password_hash: String,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password: Some(password_hash),
            first_name: first_name.into(),
            last_name: last_name.into(),
            verified: false,
            google_sign_on: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new Google sign-on user (verified, no password)
    pub fn new_oauth(
        email: Email,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            verified: true,
            google_sign_on: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this account may be authenticated with a password
    pub fn can_password_authenticate(&self) -> bool {
        !self.google_sign_on && self.password.is_some()
    }

    /// Mark the email address as verified
    pub fn mark_verified(&mut self) {
        self.verified = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_unverified() {
        let email = Email::new("a@example.com").unwrap();
        let user = User::new(email, "$argon2id$hash".into(), "Ada", "Lovelace");
        assert!(!user.verified);
        assert!(!user.google_sign_on);
        assert!(user.can_password_authenticate());
    }

    #[test]
    fn test_oauth_user_is_verified_and_passwordless() {
        let email = Email::new("a@example.com").unwrap();
        let user = User::new_oauth(email, "Ada", "Lovelace");
        assert!(user.verified);
        assert!(user.google_sign_on);
        assert!(user.password.is_none());
        assert!(!user.can_password_authenticate());
    }
}
