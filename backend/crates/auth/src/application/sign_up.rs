//! Sign Up Use Case
//!
//! Registers a new password-based account, seeds its session, and sends
//! the verification email. The account starts unverified; most
//! protected routes stay closed until the verification link is opened.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::mail;
use crate::application::tokens::TokenIssuer;
use crate::domain::entity::{Session, User};
use crate::domain::repository::{MailDispatcher, SessionStore, TokenStore, UserDirectory};
use crate::domain::value_object::{Email, TokenKind};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<D, C, M>
where
    D: UserDirectory,
    C: SessionStore + TokenStore,
    M: MailDispatcher,
{
    directory: Arc<D>,
    cache: Arc<C>,
    tokens: Arc<TokenIssuer<C>>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<D, C, M> SignUpUseCase<D, C, M>
where
    D: UserDirectory,
    C: SessionStore + TokenStore,
    M: MailDispatcher,
{
    pub fn new(
        directory: Arc<D>,
        cache: Arc<C>,
        tokens: Arc<TokenIssuer<C>>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            directory,
            cache,
            tokens,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<User> {
        let email = Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let password = ClearTextPassword::new(input.password)?;
        let hash = password.hash_with(self.config.hash_cost)?;

        let user = User::new(
            email,
            hash.as_phc_string().to_string(),
            input.first_name,
            input.last_name,
        );

        // The directory's uniqueness constraint is the arbiter; no
        // check-then-insert race here.
        self.directory.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        let session = Session::from_user(&user);
        self.cache
            .put_session(&session, self.config.session_ttl)
            .await?;

        let token = self.tokens.issue(TokenKind::Verify, &user.user_id).await?;
        let message = mail::verification_email(&user, &self.config.api_url, &token);
        mail::dispatch_best_effort(self.mailer.as_ref(), message).await;

        Ok(user)
    }
}
