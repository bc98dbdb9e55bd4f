use serde::{Deserialize, Serialize};

use crate::domain::models::token::ActivationCode;

pub const ACTIVATION_SUBJECT: &str = "Account activation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailTemplateName {
    #[serde(rename = "ACTIVATE_ACCOUNT")]
    ActivateAccount,
}

impl EmailTemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActivateAccount => "ACTIVATE_ACCOUNT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVATE_ACCOUNT" => Some(Self::ActivateAccount),
            _ => None,
        }
    }
}

/// Everything the notification sink needs to deliver one activation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationEmail {
    pub recipient_email: String,
    pub recipient_name: String,
    pub template: EmailTemplateName,
    pub activation_url: String,
    pub activation_code: String,
    pub subject: String,
}

impl ActivationEmail {
    pub fn new(
        recipient_email: &str,
        recipient_name: String,
        activation_url: &str,
        code: &ActivationCode,
    ) -> Self {
        Self {
            recipient_email: recipient_email.to_string(),
            recipient_name,
            template: EmailTemplateName::ActivateAccount,
            activation_url: activation_url.to_string(),
            activation_code: code.as_str().to_string(),
            subject: ACTIVATION_SUBJECT.to_string(),
        }
    }
}

/// Pending outbox entry as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessage {
    pub id: i32,
    pub email: ActivationEmail,
    pub attempts: i32,
}
