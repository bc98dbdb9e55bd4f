use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{
    error::NotificationError,
    models::notification::ActivationEmail,
    services::notification_service::NotificationSink,
};

/// Sink used when no mail provider is configured; it only logs.
#[derive(Clone, Default)]
pub struct LogNotificationSink;

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn send_email(&self, email: &ActivationEmail) -> Result<(), NotificationError> {
        info!(
            recipient = %email.recipient_email,
            template = email.template.as_str(),
            subject = %email.subject,
            "mail provider not configured, email not delivered"
        );
        debug!(
            recipient = %email.recipient_email,
            activation_url = %email.activation_url,
            activation_code = %email.activation_code,
            "undelivered activation email"
        );
        Ok(())
    }
}
