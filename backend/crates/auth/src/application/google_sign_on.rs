//! Google Sign-On Use Case
//!
//! Find-or-create sign-in for identities asserted by Google. Accounts
//! created here are verified from the start and hold no password; the
//! password paths refuse them permanently.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::sign_in::SignInOutput;
use crate::application::tokens::TokenIssuer;
use crate::domain::entity::Session;
use crate::domain::repository::{SessionStore, TokenStore, UserDirectory};
use crate::domain::value_object::Email;
use crate::error::{AuthError, AuthResult};

/// Google sign-on input: identity fields asserted by the provider
pub struct GoogleSignOnInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Google sign-on use case
pub struct GoogleSignOnUseCase<D, C>
where
    D: UserDirectory,
    C: SessionStore + TokenStore,
{
    directory: Arc<D>,
    cache: Arc<C>,
    tokens: Arc<TokenIssuer<C>>,
    config: Arc<AuthConfig>,
}

impl<D, C> GoogleSignOnUseCase<D, C>
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

    pub async fn execute(&self, input: GoogleSignOnInput) -> AuthResult<SignInOutput> {
        let email = Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let user = self
            .directory
            .upsert_oauth_user(&email, &input.first_name, &input.last_name)
            .await?;

        let (access_token, refresh_token) = self.tokens.issue_pair(&user.user_id).await?;

        // A stale unverified session is re-derived from the user record
        let session = match self.cache.get_session(&user.user_id).await? {
            Some(session) if session.verified => session,
            _ => {
                let session = Session::from_user(&user);
                self.cache
                    .put_session(&session, self.config.session_ttl)
                    .await?;
                session
            }
        };

        tracing::info!(user_id = %user.user_id, "User signed in with Google");

        Ok(SignInOutput {
            access_token,
            refresh_token,
            session,
        })
    }
}
