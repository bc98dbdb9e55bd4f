use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Serialize;

use crate::{
    config::BrevoConfig,
    domain::{
        error::NotificationError,
        models::notification::ActivationEmail,
        services::notification_service::NotificationSink,
    },
    infrastructure::email_template,
};

pub const BREVO_SEND_EMAIL_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody {
    sender: BrevoEmailAddress,
    to: Vec<BrevoEmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

/// Delivers activation emails through Brevo's transactional email API.
#[derive(Clone)]
pub struct BrevoNotificationSink {
    client: reqwest::Client,
    endpoint: String,
    config: BrevoConfig,
}

impl BrevoNotificationSink {
    /// Fails only when the reqwest client cannot be built.
    pub fn new(config: BrevoConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: BREVO_SEND_EMAIL_URL.to_string(),
            config,
        })
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl NotificationSink for BrevoNotificationSink {
    async fn send_email(&self, email: &ActivationEmail) -> Result<(), NotificationError> {
        let rendered = email_template::render(email);
        let body = BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: self.config.sender_email.clone(),
                name: self.config.sender_name.clone(),
            },
            to: vec![BrevoEmailAddress {
                email: email.recipient_email.clone(),
                name: Some(email.recipient_name.clone()),
            }],
            subject: email.subject.clone(),
            html_content: rendered.html,
            text_content: rendered.text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.config.api_key)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, "book-network-api/0.1")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.delivery_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl BrevoNotificationSink {
    fn delivery_error(&self, e: reqwest::Error) -> NotificationError {
        if e.is_timeout() {
            NotificationError::Delivery(format!(
                "no response within {:?}",
                self.config.request_timeout
            ))
        } else {
            NotificationError::Delivery(e.to_string())
        }
    }
}
