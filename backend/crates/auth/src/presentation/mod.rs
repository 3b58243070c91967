//! Presentation Layer - HTTP Interface

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
