use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_SENT: &str = "SENT";
pub const STATUS_FAILED: &str = "FAILED";

/// Activation emails waiting to be handed to the mail provider.
///
/// Rows are written in the same transaction as the user and token they
/// describe, then drained by the outbox dispatcher.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "email_outbox")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub recipient_email: String,

    pub recipient_name: String,

    pub template: String,

    pub activation_url: String,

    pub activation_code: String,

    pub subject: String,

    /// One of `PENDING`, `SENT` or `FAILED`.
    pub status: String,

    pub attempts: i32,

    pub last_error: Option<String>,

    pub created_at: DateTimeUtc,

    pub next_attempt_at: DateTimeUtc,

    pub sent_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
