//! Scenario tests for the authentication core
//!
//! Run the use cases end-to-end against in-memory fakes standing in for
//! Postgres, Redis and the mail queue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use platform::password::HashCost;
use platform::token::TokenSigner;

use crate::application::check_access::{AccessPolicy, CheckAccessUseCase};
use crate::application::config::AuthConfig;
use crate::application::google_sign_on::{GoogleSignOnInput, GoogleSignOnUseCase};
use crate::application::password_reset::{ForgotPasswordUseCase, ResetPasswordUseCase};
use crate::application::refresh::{GetAccessTokenUseCase, LogOutUseCase};
use crate::application::sign_in::{SignInInput, SignInOutput, SignInUseCase};
use crate::application::sign_up::{SignUpInput, SignUpUseCase};
use crate::application::tokens::TokenIssuer;
use crate::application::verify_email::{GetVerificationMailUseCase, VerifyEmailUseCase};
use crate::domain::entity::{Session, User};
use crate::domain::repository::{
    EmailMessage, MailDispatcher, SessionStore, TokenStore, UserDirectory,
};
use crate::domain::value_object::{Email, TokenKind, UserId};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory fakes
// ============================================================================

/// In-memory user directory with an email uniqueness constraint
#[derive(Default)]
struct MemoryDirectory {
    users: Mutex<HashMap<UserId, User>>,
}

impl UserDirectory for MemoryDirectory {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn set_verified(&self, user_id: &UserId, verified: bool) -> AuthResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(user_id) {
            user.verified = verified;
        }
        Ok(())
    }

    async fn set_password(&self, user_id: &UserId, password_hash: &str) -> AuthResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(user_id) {
            user.password = Some(password_hash.to_string());
        }
        Ok(())
    }

    async fn upsert_oauth_user(
        &self,
        email: &Email,
        first_name: &str,
        last_name: &str,
    ) -> AuthResult<User> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.values_mut().find(|u| &u.email == email) {
            user.first_name = first_name.to_string();
            user.last_name = last_name.to_string();
            return Ok(user.clone());
        }
        let user = User::new_oauth(email.clone(), first_name, last_name);
        users.insert(user.user_id, user.clone());
        Ok(user)
    }
}

/// In-memory session/token cache (TTLs accepted, not enforced)
#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStore for MemoryCache {
    async fn put_session(&self, session: &Session, _ttl: Duration) -> AuthResult<()> {
        let value = serde_json::to_string(session).unwrap();
        self.entries
            .lock()
            .unwrap()
            .insert(session.cache_key(), value);
        Ok(())
    }

    async fn get_session(&self, user_id: &UserId) -> AuthResult<Option<Session>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&user_id.to_string())
            .map(|json| serde_json::from_str(json).unwrap()))
    }

    async fn delete_session(&self, user_id: &UserId) -> AuthResult<()> {
        self.entries.lock().unwrap().remove(&user_id.to_string());
        Ok(())
    }
}

impl TokenStore for MemoryCache {
    async fn put_token(
        &self,
        kind: TokenKind,
        user_id: &UserId,
        token: &str,
        _ttl: Duration,
    ) -> AuthResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(kind.cache_key(user_id), token.to_string());
        Ok(())
    }

    async fn get_token(&self, kind: TokenKind, user_id: &UserId) -> AuthResult<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&kind.cache_key(user_id))
            .cloned())
    }

    async fn delete_token(&self, kind: TokenKind, user_id: &UserId) -> AuthResult<()> {
        self.entries.lock().unwrap().remove(&kind.cache_key(user_id));
        Ok(())
    }
}

/// Records every message instead of delivering it
#[derive(Default)]
struct MemoryMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    fn sent_to(&self, to: &str) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == to)
            .cloned()
            .collect()
    }
}

impl MailDispatcher for MemoryMailer {
    async fn enqueue(&self, message: EmailMessage) -> AuthResult<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

// ============================================================================
// Test harness
// ============================================================================

struct TestEnv {
    directory: Arc<MemoryDirectory>,
    cache: Arc<MemoryCache>,
    mailer: Arc<MemoryMailer>,
    signer: Arc<TokenSigner>,
    tokens: Arc<TokenIssuer<MemoryCache>>,
    config: Arc<AuthConfig>,
}

impl TestEnv {
    fn new() -> Self {
        let config = Arc::new(AuthConfig {
            hash_cost: HashCost::fast(),
            ..AuthConfig::with_random_secret()
        });
        let directory = Arc::new(MemoryDirectory::default());
        let cache = Arc::new(MemoryCache::default());
        let mailer = Arc::new(MemoryMailer::default());
        let signer = Arc::new(TokenSigner::new(&config.signing_secret));
        let tokens = Arc::new(TokenIssuer::new(
            cache.clone(),
            signer.clone(),
            config.clone(),
        ));

        Self {
            directory,
            cache,
            mailer,
            signer,
            tokens,
            config,
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<User> {
        let use_case = SignUpUseCase::new(
            self.directory.clone(),
            self.cache.clone(),
            self.tokens.clone(),
            self.mailer.clone(),
            self.config.clone(),
        );
        use_case
            .execute(SignUpInput {
                email: email.to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<SignInOutput> {
        let use_case = SignInUseCase::new(
            self.directory.clone(),
            self.cache.clone(),
            self.tokens.clone(),
            self.config.clone(),
        );
        use_case
            .execute(SignInInput {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
    }

    async fn google_sign_on(&self, email: &str) -> AuthResult<SignInOutput> {
        let use_case = GoogleSignOnUseCase::new(
            self.directory.clone(),
            self.cache.clone(),
            self.tokens.clone(),
            self.config.clone(),
        );
        use_case
            .execute(GoogleSignOnInput {
                email: email.to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
            })
            .await
    }

    async fn verify_email(&self, token: &str) -> String {
        let use_case = VerifyEmailUseCase::new(
            self.directory.clone(),
            self.cache.clone(),
            self.signer.clone(),
            self.config.clone(),
        );
        use_case.execute(token).await
    }

    async fn get_verification_mail(&self, email: &str) -> AuthResult<()> {
        let use_case = GetVerificationMailUseCase::new(
            self.directory.clone(),
            self.tokens.clone(),
            self.mailer.clone(),
            self.config.clone(),
        );
        use_case.execute(email).await
    }

    async fn forgot_password(&self, email: &str) -> AuthResult<()> {
        let use_case = ForgotPasswordUseCase::new(
            self.directory.clone(),
            self.tokens.clone(),
            self.mailer.clone(),
            self.config.clone(),
        );
        use_case.execute(email).await
    }

    async fn reset_password(&self, token: &str, password: &str) -> AuthResult<()> {
        let use_case = ResetPasswordUseCase::new(
            self.directory.clone(),
            self.cache.clone(),
            self.signer.clone(),
            self.config.clone(),
        );
        use_case.execute(token, password.to_string()).await
    }

    async fn get_access_token(&self, refresh_token: &str) -> AuthResult<String> {
        let use_case = GetAccessTokenUseCase::new(
            self.cache.clone(),
            self.tokens.clone(),
            self.signer.clone(),
        );
        use_case.execute(refresh_token).await
    }

    async fn log_out(&self, refresh_token: &str) -> AuthResult<()> {
        let use_case = LogOutUseCase::new(self.cache.clone(), self.signer.clone());
        use_case.execute(refresh_token).await
    }

    async fn check_access(
        &self,
        token: Option<&str>,
        policy: AccessPolicy,
    ) -> AuthResult<Option<Session>> {
        let use_case = CheckAccessUseCase::new(self.cache.clone(), self.signer.clone());
        use_case.execute(token, policy).await
    }

    async fn cached_token(&self, kind: TokenKind, user_id: &UserId) -> String {
        self.cache.get_token(kind, user_id).await.unwrap().unwrap()
    }

    fn verified_url(&self) -> String {
        format!("{}/verified", self.config.frontend_url)
    }

    fn unverified_url(&self) -> String {
        format!("{}/verify", self.config.frontend_url)
    }
}

const PASSWORD: &str = "Valid1!@Password";

// ============================================================================
// Signup / sign-in
// ============================================================================

mod signup_signin {
    use super::*;

    #[tokio::test]
    async fn test_signup_then_signin() {
        let env = TestEnv::new();
        env.sign_up("a@x.com", PASSWORD).await.unwrap();

        let output = env.sign_in("a@x.com", PASSWORD).await.unwrap();
        assert_eq!(output.session.email.as_str(), "a@x.com");
        assert!(!output.session.verified);
        assert!(!output.access_token.is_empty());
        assert!(!output.refresh_token.is_empty());

        // Both tokens carry valid signatures naming the user
        let user = env
            .directory
            .find_by_email(&Email::new("a@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        let claims = env.signer.verify(&output.access_token).unwrap();
        assert_eq!(claims.sub, user.user_id.to_string());
    }

    #[tokio::test]
    async fn test_signup_sends_verification_mail() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();

        let sent = env.mailer.sent_to("a@x.com");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Verify Your Email Address");

        // The emailed token is the live one in the verify slot
        let token = env.cached_token(TokenKind::Verify, &user.user_id).await;
        assert!(sent[0].html.contains(&token));
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflict() {
        let env = TestEnv::new();
        env.sign_up("a@x.com", PASSWORD).await.unwrap();

        let result = env.sign_up("a@x.com", "Other1!@Password").await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();

        let result = env.sign_in("a@x.com", "Wrong1!@Password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        // User record unchanged
        let after = env
            .directory
            .find_by_id(&user.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.password, user.password);
    }

    #[tokio::test]
    async fn test_signin_unknown_email() {
        let env = TestEnv::new();
        let result = env.sign_in("nobody@x.com", PASSWORD).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_signup_rejects_weak_password() {
        let env = TestEnv::new();
        let result = env.sign_up("a@x.com", "short").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }
}

// ============================================================================
// Google sign-on
// ============================================================================

mod google_sign_on {
    use super::*;

    #[tokio::test]
    async fn test_oauth_account_is_verified_from_the_start() {
        let env = TestEnv::new();
        let output = env.google_sign_on("g@x.com").await.unwrap();
        assert!(output.session.verified);

        let user = env
            .directory
            .find_by_email(&Email::new("g@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(user.google_sign_on);
        assert!(user.password.is_none());
    }

    #[tokio::test]
    async fn test_oauth_account_cannot_password_signin() {
        let env = TestEnv::new();
        env.google_sign_on("g@x.com").await.unwrap();

        let result = env.sign_in("g@x.com", PASSWORD).await;
        assert!(matches!(result, Err(AuthError::GoogleSignOnAccount)));
    }

    #[tokio::test]
    async fn test_oauth_account_cannot_request_password_reset() {
        let env = TestEnv::new();
        env.google_sign_on("g@x.com").await.unwrap();

        let result = env.forgot_password("g@x.com").await;
        assert!(matches!(result, Err(AuthError::OauthAccountNoPassword)));
    }

    #[tokio::test]
    async fn test_oauth_account_cannot_reset_password() {
        let env = TestEnv::new();
        let output = env.google_sign_on("g@x.com").await.unwrap();
        let user_id = output.session.id;

        // Even a well-formed reset token must be refused
        let token = env.tokens.issue(TokenKind::Reset, &user_id).await.unwrap();
        let result = env.reset_password(&token, PASSWORD).await;
        assert!(matches!(result, Err(AuthError::OauthAccountNoPassword)));
    }

    #[tokio::test]
    async fn test_repeat_sign_on_reuses_account() {
        let env = TestEnv::new();
        let first = env.google_sign_on("g@x.com").await.unwrap();
        let second = env.google_sign_on("g@x.com").await.unwrap();
        assert_eq!(first.session.id, second.session.id);
    }
}

// ============================================================================
// Token supersession / refresh / logout
// ============================================================================

mod token_lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_new_access_token_revokes_previous() {
        let env = TestEnv::new();
        env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let first = env.sign_in("a@x.com", PASSWORD).await.unwrap();

        // Same subject and TTL signed in the same second would produce an
        // identical token; wait so the second pair actually differs
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let second = env.sign_in("a@x.com", PASSWORD).await.unwrap();
        assert_ne!(first.access_token, second.access_token);

        let result = env
            .check_access(Some(first.access_token.as_str()), AccessPolicy::AllowUnverified)
            .await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));

        let ok = env
            .check_access(Some(second.access_token.as_str()), AccessPolicy::AllowUnverified)
            .await;
        assert!(ok.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_refresh_mints_access_without_rotating_refresh() {
        let env = TestEnv::new();
        env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let output = env.sign_in("a@x.com", PASSWORD).await.unwrap();
        let user_id = output.session.id;

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let access = env.get_access_token(&output.refresh_token).await.unwrap();

        assert_eq!(env.cached_token(TokenKind::Access, &user_id).await, access);
        assert_eq!(
            env.cached_token(TokenKind::Refresh, &user_id).await,
            output.refresh_token
        );

        // The refresh token still works afterwards
        assert!(env.get_access_token(&output.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_then_refresh_fails() {
        let env = TestEnv::new();
        env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let output = env.sign_in("a@x.com", PASSWORD).await.unwrap();

        env.log_out(&output.refresh_token).await.unwrap();

        let result = env.get_access_token(&output.refresh_token).await;
        assert!(matches!(result, Err(AuthError::InvalidOrExpiredToken)));
    }

    #[tokio::test]
    async fn test_logout_revokes_access_token_too() {
        let env = TestEnv::new();
        env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let output = env.sign_in("a@x.com", PASSWORD).await.unwrap();

        env.log_out(&output.refresh_token).await.unwrap();

        let result = env
            .check_access(Some(output.access_token.as_str()), AccessPolicy::AllowUnverified)
            .await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_garbage_refresh_token_rejected() {
        let env = TestEnv::new();
        let result = env.get_access_token("not-a-token").await;
        assert!(matches!(result, Err(AuthError::InvalidOrExpiredToken)));
    }
}

// ============================================================================
// Email verification
// ============================================================================

mod email_verification {
    use super::*;

    #[tokio::test]
    async fn test_verify_email_flips_user_and_session() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let token = env.cached_token(TokenKind::Verify, &user.user_id).await;

        let target = env.verify_email(&token).await;
        assert_eq!(target, env.verified_url());

        let after = env
            .directory
            .find_by_id(&user.user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(after.verified);

        let session = env.cache.get_session(&user.user_id).await.unwrap().unwrap();
        assert!(session.verified);
    }

    #[tokio::test]
    async fn test_verify_email_is_single_use_but_idempotent() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let token = env.cached_token(TokenKind::Verify, &user.user_id).await;

        assert_eq!(env.verify_email(&token).await, env.verified_url());

        // The verify slot is consumed
        assert!(
            env.cache
                .get_token(TokenKind::Verify, &user.user_id)
                .await
                .unwrap()
                .is_none()
        );

        // A second presentation lands on the verified page without error
        assert_eq!(env.verify_email(&token).await, env.verified_url());
    }

    #[tokio::test]
    async fn test_superseded_verify_token_hits_unverified_page() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let old = env.cached_token(TokenKind::Verify, &user.user_id).await;

        tokio::time::sleep(Duration::from_millis(1100)).await;
        env.get_verification_mail("a@x.com").await.unwrap();
        let new = env.cached_token(TokenKind::Verify, &user.user_id).await;
        assert_ne!(old, new);

        assert_eq!(env.verify_email(&old).await, env.unverified_url());

        // The user stays unverified and the new token still works
        let after = env
            .directory
            .find_by_id(&user.user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!after.verified);
        assert_eq!(env.verify_email(&new).await, env.verified_url());
    }

    #[tokio::test]
    async fn test_garbage_token_degrades_to_verified_page() {
        let env = TestEnv::new();
        assert_eq!(env.verify_email("not-a-token").await, env.verified_url());
    }

    #[tokio::test]
    async fn test_verification_mail_for_unknown_email() {
        let env = TestEnv::new();
        let result = env.get_verification_mail("nobody@x.com").await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_verification_mail_noop_when_already_verified() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let token = env.cached_token(TokenKind::Verify, &user.user_id).await;
        env.verify_email(&token).await;

        let before = env.mailer.sent_to("a@x.com").len();
        env.get_verification_mail("a@x.com").await.unwrap();
        assert_eq!(env.mailer.sent_to("a@x.com").len(), before);
    }
}

// ============================================================================
// Password reset
// ============================================================================

mod password_reset {
    use super::*;

    const NEW_PASSWORD: &str = "Fresh2!@Password";

    #[tokio::test]
    async fn test_reset_password_flow() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();

        env.forgot_password("a@x.com").await.unwrap();
        let sent = env.mailer.sent_to("a@x.com");
        assert_eq!(sent.last().unwrap().subject, "Reset Your Password");

        let token = env.cached_token(TokenKind::Reset, &user.user_id).await;
        env.reset_password(&token, NEW_PASSWORD).await.unwrap();

        assert!(env.sign_in("a@x.com", NEW_PASSWORD).await.is_ok());
        assert!(matches!(
            env.sign_in("a@x.com", PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();

        env.forgot_password("a@x.com").await.unwrap();
        let token = env.cached_token(TokenKind::Reset, &user.user_id).await;

        env.reset_password(&token, NEW_PASSWORD).await.unwrap();

        let result = env.reset_password(&token, "Again3!@Password").await;
        assert!(matches!(result, Err(AuthError::InvalidOrExpiredToken)));
        assert!(env.sign_in("a@x.com", NEW_PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_superseded_reset_token_fails_and_password_unchanged() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();

        env.forgot_password("a@x.com").await.unwrap();
        let old = env.cached_token(TokenKind::Reset, &user.user_id).await;

        tokio::time::sleep(Duration::from_millis(1100)).await;
        env.forgot_password("a@x.com").await.unwrap();
        let new = env.cached_token(TokenKind::Reset, &user.user_id).await;
        assert_ne!(old, new);

        let result = env.reset_password(&old, NEW_PASSWORD).await;
        assert!(matches!(result, Err(AuthError::InvalidOrExpiredToken)));
        assert!(env.sign_in("a@x.com", PASSWORD).await.is_ok());
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email() {
        let env = TestEnv::new();
        let result = env.forgot_password("nobody@x.com").await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_reset_rejects_weak_password_without_consuming_token() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();

        env.forgot_password("a@x.com").await.unwrap();
        let token = env.cached_token(TokenKind::Reset, &user.user_id).await;

        let result = env.reset_password(&token, "short").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));

        // The link stays usable after a policy rejection
        env.reset_password(&token, NEW_PASSWORD).await.unwrap();
    }
}

// ============================================================================
// Access guard
// ============================================================================

mod access_guard {
    use super::*;

    #[tokio::test]
    async fn test_public_policy_needs_no_token() {
        let env = TestEnv::new();
        let session = env.check_access(None, AccessPolicy::Public).await.unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_missing_token_unauthorized() {
        let env = TestEnv::new();
        let result = env.check_access(None, AccessPolicy::AllowUnverified).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_garbage_token_unauthorized() {
        let env = TestEnv::new();
        let result = env
            .check_access(Some("not-a-token"), AccessPolicy::AllowUnverified)
            .await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_unverified_session_forbidden_on_verified_routes() {
        let env = TestEnv::new();
        env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let output = env.sign_in("a@x.com", PASSWORD).await.unwrap();

        let result = env
            .check_access(Some(output.access_token.as_str()), AccessPolicy::RequireVerified)
            .await;
        assert!(matches!(result, Err(AuthError::Forbidden)));

        let session = env
            .check_access(Some(output.access_token.as_str()), AccessPolicy::AllowUnverified)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_verified_session_passes_verified_routes() {
        let env = TestEnv::new();
        let user = env.sign_up("a@x.com", PASSWORD).await.unwrap();
        let token = env.cached_token(TokenKind::Verify, &user.user_id).await;
        env.verify_email(&token).await;

        let output = env.sign_in("a@x.com", PASSWORD).await.unwrap();
        let session = env
            .check_access(Some(output.access_token.as_str()), AccessPolicy::RequireVerified)
            .await
            .unwrap()
            .unwrap();
        assert!(session.verified);
    }
}
