//! Value Objects

pub mod email;
pub mod token_kind;
pub mod user_id;

pub use email::Email;
pub use token_kind::TokenKind;
pub use user_id::UserId;
