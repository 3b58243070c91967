//! Password Reset Use Cases
//!
//! `ForgotPasswordUseCase` issues the single-use reset token and mails
//! the reset link. `ResetPasswordUseCase` consumes it: the token must
//! carry a valid signature AND byte-equal the cached copy, and the
//! cached copy is deleted before the new password lands, so a reset
//! link works exactly once.

use std::sync::Arc;

use platform::password::ClearTextPassword;
use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::mail;
use crate::application::tokens::TokenIssuer;
use crate::domain::repository::{MailDispatcher, TokenStore, UserDirectory};
use crate::domain::value_object::{Email, TokenKind, UserId};
use crate::error::{AuthError, AuthResult};

/// Forgot password use case
pub struct ForgotPasswordUseCase<D, C, M>
where
    D: UserDirectory,
    C: TokenStore,
    M: MailDispatcher,
{
    directory: Arc<D>,
    tokens: Arc<TokenIssuer<C>>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<D, C, M> ForgotPasswordUseCase<D, C, M>
where
    D: UserDirectory,
    C: TokenStore,
    M: MailDispatcher,
{
    pub fn new(
        directory: Arc<D>,
        tokens: Arc<TokenIssuer<C>>,
        mailer: Arc<M>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            directory,
            tokens,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email).map_err(|e| AuthError::Validation(e.to_string()))?;

        let user = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.google_sign_on {
            return Err(AuthError::OauthAccountNoPassword);
        }

        let token = self.tokens.issue(TokenKind::Reset, &user.user_id).await?;
        let message = mail::reset_password_email(&user, &self.config.frontend_url, &token);
        mail::dispatch_best_effort(self.mailer.as_ref(), message).await;

        tracing::info!(user_id = %user.user_id, "Password reset requested");

        Ok(())
    }
}

/// Reset password use case
pub struct ResetPasswordUseCase<D, C>
where
    D: UserDirectory,
    C: TokenStore,
{
    directory: Arc<D>,
    cache: Arc<C>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<D, C> ResetPasswordUseCase<D, C>
where
    D: UserDirectory,
    C: TokenStore,
{
    pub fn new(
        directory: Arc<D>,
        cache: Arc<C>,
        signer: Arc<TokenSigner>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            directory,
            cache,
            signer,
            config,
        }
    }

    pub async fn execute(&self, token: &str, new_password: String) -> AuthResult<()> {
        // Policy check first: a rejected password leaves the reset token
        // live so the user can retry from the same link.
        let password = ClearTextPassword::new(new_password)?;

        let claims = self.signer.verify(token)?;
        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        let stored = self.cache.get_token(TokenKind::Reset, &user_id).await?;
        if stored.as_deref() != Some(token) {
            return Err(AuthError::InvalidOrExpiredToken);
        }

        let user = self
            .directory
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        if user.google_sign_on {
            return Err(AuthError::OauthAccountNoPassword);
        }

        // Consume the token before writing the new password; the key is
        // the canonical reset slot, never the token value.
        self.cache.delete_token(TokenKind::Reset, &user_id).await?;

        let hash = password.hash_with(self.config.hash_cost)?;
        self.directory
            .set_password(&user_id, hash.as_phc_string())
            .await?;

        tracing::info!(user_id = %user_id, "Password reset completed");

        Ok(())
    }
}
