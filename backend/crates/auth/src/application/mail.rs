//! Outbound Mail Templates
//!
//! Builds the verification and reset messages. Dispatch itself is
//! best-effort; use cases log a failure and carry on so a mail outage
//! never fails the auth operation.

use crate::domain::entity::User;
use crate::domain::repository::{EmailMessage, MailDispatcher};

/// Build the email verification message
///
/// The link targets the API directly; opening it completes verification
/// and redirects to the frontend.
pub fn verification_email(user: &User, api_url: &str, token: &str) -> EmailMessage {
    let link = format!("{}/auth/verify-email?token={}", api_url, token);

    EmailMessage {
        to: user.email.to_string(),
        subject: "Verify Your Email Address".to_string(),
        html: format!(
            "<p>Hello {},</p>\
             <p>Please verify your email address by clicking the link below:</p>\
             <p><a href=\"{link}\">Verify Email</a></p>\
             <p>This link expires in one hour. If you did not sign up, you can ignore this email.</p>",
            user.last_name
        ),
    }
}

/// Build the password reset message
///
/// The link targets the frontend reset form, which posts the token back
/// together with the new password.
pub fn reset_password_email(user: &User, frontend_url: &str, token: &str) -> EmailMessage {
    let link = format!("{}/forgot-password?token={}", frontend_url, token);

    EmailMessage {
        to: user.email.to_string(),
        subject: "Reset Your Password".to_string(),
        html: format!(
            "<p>Hello {},</p>\
             <p>We received a request to reset your password. Click the link below to choose a new one:</p>\
             <p><a href=\"{link}\">Reset Password</a></p>\
             <p>This link expires in one hour. If you did not request a reset, you can ignore this email.</p>",
            user.last_name
        ),
    }
}

/// Enqueue a message, logging instead of failing on dispatch errors
pub async fn dispatch_best_effort<M: MailDispatcher>(mailer: &M, message: EmailMessage) {
    let to = message.to.clone();
    let subject = message.subject.clone();

    if let Err(e) = mailer.enqueue(message).await {
        tracing::error!(to = %to, subject = %subject, error = %e, "Failed to enqueue email");
    }
}
