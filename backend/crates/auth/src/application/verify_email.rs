//! Email Verification Use Cases
//!
//! `VerifyEmailUseCase` consumes the token carried by the emailed link
//! and answers with a redirect target. The endpoint is reached by
//! clicking a link, so it never produces an error response: every
//! failure degrades to a landing page instead.
//!
//! `GetVerificationMailUseCase` re-issues the verification mail for an
//! account that has not verified yet.

use std::sync::Arc;

use platform::token::TokenSigner;

use crate::application::config::AuthConfig;
use crate::application::mail;
use crate::application::tokens::TokenIssuer;
use crate::domain::repository::{MailDispatcher, SessionStore, TokenStore, UserDirectory};
use crate::domain::value_object::{Email, TokenKind, UserId};
use crate::error::{AuthError, AuthResult};

/// Email verification use case
pub struct VerifyEmailUseCase<D, C>
where
    D: UserDirectory,
    C: SessionStore + TokenStore,
{
    directory: Arc<D>,
    cache: Arc<C>,
    signer: Arc<TokenSigner>,
    config: Arc<AuthConfig>,
}

impl<D, C> VerifyEmailUseCase<D, C>
where
    D: UserDirectory,
    C: SessionStore + TokenStore,
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

    /// Consume a verification token and return the redirect target
    ///
    /// Never fails: any error inside the flow collapses to the verified
    /// landing page, exactly like an already-used link.
    pub async fn execute(&self, token: &str) -> String {
        match self.try_verify(token).await {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(error = %e, "Email verification degraded to landing page");
                self.verified_target()
            }
        }
    }

    async fn try_verify(&self, token: &str) -> AuthResult<String> {
        let claims = self.signer.verify(token)?;
        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        // Already verified: idempotent outcome, nothing to re-delete
        if let Some(session) = self.cache.get_session(&user_id).await? {
            if session.verified {
                return Ok(self.verified_target());
            }
        }

        let stored = self.cache.get_token(TokenKind::Verify, &user_id).await?;
        if stored.as_deref() != Some(token) {
            // Superseded by a newer verification request
            return Ok(self.unverified_target());
        }

        self.cache.delete_token(TokenKind::Verify, &user_id).await?;

        if let Some(mut session) = self.cache.get_session(&user_id).await? {
            session.verified = true;
            self.cache
                .put_session(&session, self.config.session_ttl)
                .await?;
        }

        self.directory.set_verified(&user_id, true).await?;

        tracing::info!(user_id = %user_id, "Email verified");

        Ok(self.verified_target())
    }

    fn verified_target(&self) -> String {
        format!("{}/verified", self.config.frontend_url)
    }

    fn unverified_target(&self) -> String {
        format!("{}/verify", self.config.frontend_url)
    }
}

/// Re-send the verification mail for an unverified account
pub struct GetVerificationMailUseCase<D, C, M>
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

impl<D, C, M> GetVerificationMailUseCase<D, C, M>
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

        // Already verified accounts get no mail
        if user.verified {
            return Ok(());
        }

        let token = self.tokens.issue(TokenKind::Verify, &user.user_id).await?;
        let message = mail::verification_email(&user, &self.config.api_url, &token);
        mail::dispatch_best_effort(self.mailer.as_ref(), message).await;

        Ok(())
    }
}
