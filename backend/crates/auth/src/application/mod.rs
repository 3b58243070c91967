//! Application Layer - Use Cases
//!
//! One use case per operation, each holding its collaborators behind
//! `Arc` and exposing a single `execute` method.

pub mod check_access;
pub mod config;
pub mod google_sign_on;
pub mod mail;
pub mod password_reset;
pub mod refresh;
pub mod sign_in;
pub mod sign_up;
pub mod tokens;
pub mod verify_email;

pub use check_access::{AccessPolicy, CheckAccessUseCase};
pub use config::AuthConfig;
pub use google_sign_on::GoogleSignOnUseCase;
pub use password_reset::{ForgotPasswordUseCase, ResetPasswordUseCase};
pub use refresh::{GetAccessTokenUseCase, LogOutUseCase};
pub use sign_in::SignInUseCase;
pub use sign_up::SignUpUseCase;
pub use tokens::TokenIssuer;
pub use verify_email::{GetVerificationMailUseCase, VerifyEmailUseCase};
