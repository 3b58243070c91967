//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of cross-domain vocabulary:
//! - Common error types and result aliases
//! - HTTP status classification for errors
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
