use async_trait::async_trait;

use crate::domain::{error::NotificationError, models::notification::ActivationEmail};

/// Delivery boundary for activation emails.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send_email(&self, email: &ActivationEmail) -> Result<(), NotificationError>;
}
