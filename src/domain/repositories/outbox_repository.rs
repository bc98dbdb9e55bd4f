use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{error::RepositoryError, models::notification::OutboxMessage};

#[async_trait]
pub trait OutboxRepository {
    /// Pending messages whose next attempt is due, oldest first.
    async fn fetch_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<OutboxMessage>, RepositoryError>;

    async fn mark_sent(&self, id: i32, sent_at: DateTime<Utc>) -> Result<(), RepositoryError>;

    /// Record a failed attempt. `next_attempt_at = None` gives up on the message.
    async fn record_failure(
        &self,
        id: i32,
        attempts: i32,
        error: &str,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError>;
}
