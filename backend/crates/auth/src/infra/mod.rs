//! Infrastructure Layer
//!
//! Concrete collaborators: Postgres user directory, Redis session/token
//! cache, and a Redis-list mail queue.

pub mod mail_queue;
pub mod postgres;
pub mod redis;

pub use mail_queue::RedisMailQueue;
pub use postgres::PgUserDirectory;
pub use redis::RedisCache;
