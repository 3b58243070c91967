//! Sign In Use Case
//!
//! Authenticates email/password credentials and issues a fresh
//! access/refresh pair, revoking any tokens from a previous sign-in.
//! The session is reused when still cached, re-derived from the user
//! record otherwise.

use std::sync::Arc;

use platform::password::{ClearTextPassword, StoredPasswordHash};

use crate::application::config::AuthConfig;
use crate::application::tokens::TokenIssuer;
use crate::domain::entity::Session;
use crate::domain::repository::{SessionStore, TokenStore, UserDirectory};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub session: Session,
}

/// Sign in use case
pub struct SignInUseCase<D, C>
where
    D: UserDirectory,
    C: SessionStore + TokenStore,
{
    directory: Arc<D>,
    cache: Arc<C>,
    tokens: Arc<TokenIssuer<C>>,
    config: Arc<AuthConfig>,
}

impl<D, C> SignInUseCase<D, C>
where
    D: UserDirectory,
    C: SessionStore + TokenStore,
{
    pub fn new(
        directory: Arc<D>,
        cache: Arc<C>,
        tokens: Arc<TokenIssuer<C>>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            directory,
            cache,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Any credential problem on this path maps to InvalidCredentials
        // so account existence is never disclosed.
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.google_sign_on {
            return Err(AuthError::GoogleSignOnAccount);
        }

        let stored = user
            .password
            .as_deref()
            .and_then(|h| StoredPasswordHash::from_phc_string(h).ok())
            .ok_or(AuthError::InvalidCredentials)?;

        let password = ClearTextPassword::new_unchecked(input.password);
        if !stored.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, refresh_token) = self.tokens.issue_pair(&user.user_id).await?;

        // Reuse a live session, re-derive it when expired or never made
        let session = match self.cache.get_session(&user.user_id).await? {
            Some(session) => session,
            None => {
                let session = Session::from_user(&user);
                self.cache
                    .put_session(&session, self.config.session_ttl)
                    .await?;
                session
            }
        };

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SignInOutput {
            access_token,
            refresh_token,
            session,
        })
    }
}
