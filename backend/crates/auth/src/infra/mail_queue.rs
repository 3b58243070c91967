//! Redis Mail Queue
//!
//! Pushes outbound messages onto a Redis list consumed by a separate
//! delivery worker. Delivery and retry policy live with the worker.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::repository::{EmailMessage, MailDispatcher};
use crate::error::{AuthError, AuthResult};

/// Default list key the delivery worker reads from
pub const DEFAULT_MAIL_QUEUE_KEY: &str = "mail-queue";

/// Redis-list-backed mail dispatcher
#[derive(Clone)]
pub struct RedisMailQueue {
    conn: ConnectionManager,
    queue_key: String,
}

impl RedisMailQueue {
    pub fn new(conn: ConnectionManager, queue_key: impl Into<String>) -> Self {
        Self {
            conn,
            queue_key: queue_key.into(),
        }
    }
}

impl MailDispatcher for RedisMailQueue {
    async fn enqueue(&self, message: EmailMessage) -> AuthResult<()> {
        let payload = serde_json::to_string(&message)
            .map_err(|e| AuthError::Internal(format!("Mail serialization failed: {}", e)))?;

        let mut conn = self.conn.clone();
        let _: () = conn.lpush(&self.queue_key, payload).await?;

        tracing::info!(to = %message.to, subject = %message.subject, "Email enqueued");

        Ok(())
    }
}
