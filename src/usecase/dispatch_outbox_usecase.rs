use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::{
    config::OutboxConfig,
    domain::{
        error::DomainError, repositories::outbox_repository::OutboxRepository,
        services::notification_service::NotificationSink,
    },
};

/// Exponential backoff between delivery attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: i32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub batch_size: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &OutboxConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_std(config.retry_base_delay)
                .unwrap_or_else(|_| Duration::hours(1)),
            max_delay: Duration::hours(1),
            batch_size: config.batch_size,
        }
    }

    /// When the next attempt is due after `attempts` failures, or `None` once
    /// the budget is spent.
    pub fn next_attempt_at(&self, attempts: i32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if attempts >= self.max_attempts {
            return None;
        }
        let exponent = u32::try_from(attempts.saturating_sub(1).clamp(0, 20)).unwrap_or(0);
        let delay = self
            .base_delay
            .checked_mul(2_i32.pow(exponent))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay));
        Some(now + delay)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub retried: usize,
    pub abandoned: usize,
}

/// Drains the email outbox into a [`NotificationSink`].
pub struct DispatchOutboxUsecase<O: OutboxRepository, N: NotificationSink> {
    outbox_repository: O,
    notification_sink: N,
    clock: Arc<dyn Clock + Send + Sync>,
    policy: RetryPolicy,
}

impl<O: OutboxRepository, N: NotificationSink> DispatchOutboxUsecase<O, N> {
    pub fn new(
        outbox_repository: O,
        notification_sink: N,
        clock: Arc<dyn Clock + Send + Sync>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            outbox_repository,
            notification_sink,
            clock,
            policy,
        }
    }

    /// One pass over the due messages.
    pub async fn dispatch_pending(&self) -> Result<DispatchReport, DomainError>
    where
        O: Send + Sync,
    {
        let due = self
            .outbox_repository
            .fetch_due(self.clock.utc(), self.policy.batch_size)
            .await?;

        let mut report = DispatchReport::default();
        for message in due {
            match self.notification_sink.send_email(&message.email).await {
                Ok(()) => {
                    self.outbox_repository
                        .mark_sent(message.id, self.clock.utc())
                        .await?;
                    report.sent += 1;
                }
                Err(e) => {
                    let attempts = message.attempts + 1;
                    let next_attempt_at = self.policy.next_attempt_at(attempts, self.clock.utc());
                    self.outbox_repository
                        .record_failure(message.id, attempts, &e.to_string(), next_attempt_at)
                        .await?;
                    match next_attempt_at {
                        Some(at) => {
                            warn!(message_id = message.id, attempts, retry_at = %at, error = %e, "email delivery failed");
                            report.retried += 1;
                        }
                        None => {
                            error!(message_id = message.id, attempts, error = %e, "email delivery abandoned");
                            report.abandoned += 1;
                        }
                    }
                }
            }
        }
        Ok(report)
    }

    /// Runs forever, dispatching every `poll_interval` and whenever `trigger`
    /// is notified.
    pub async fn run(&self, trigger: Arc<Notify>, poll_interval: std::time::Duration)
    where
        O: Send + Sync,
    {
        info!(?poll_interval, "outbox dispatcher started");
        loop {
            match self.dispatch_pending().await {
                Ok(report) if report != DispatchReport::default() => {
                    info!(sent = report.sent, retried = report.retried, abandoned = report.abandoned, "outbox pass finished");
                }
                Ok(_) => {}
                Err(e) => error!(error = %e, "outbox pass failed"),
            }

            tokio::select! {
                _ = trigger.notified() => {}
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
    }
}
