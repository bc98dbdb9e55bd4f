use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, models::user::UserId};

pub const ACTIVATION_CODE_LENGTH: usize = 6;

/// Lifetime of an activation token.
pub fn activation_token_ttl() -> Duration {
    Duration::minutes(15)
}

/// Fixed-length numeric code mailed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationCode(String);
impl ActivationCode {
    pub fn parse(value: String) -> Result<Self, DomainError> {
        if value.len() != ACTIVATION_CODE_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidActivationCode);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token that has been issued but not stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivationToken {
    value: ActivationCode,
    created_at: DateTime<Utc>,
    expired_at: DateTime<Utc>,
}

impl NewActivationToken {
    pub fn issue(value: ActivationCode, now: DateTime<Utc>) -> Self {
        Self {
            value,
            created_at: now,
            expired_at: now + activation_token_ttl(),
        }
    }

    pub fn value(&self) -> &ActivationCode {
        &self.value
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn expired_at(&self) -> DateTime<Utc> {
        self.expired_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationToken {
    id: i32,
    value: ActivationCode,
    user_id: UserId,
    created_at: DateTime<Utc>,
    expired_at: DateTime<Utc>,
    validated_at: Option<DateTime<Utc>>,
}

impl ActivationToken {
    pub fn new(
        id: i32,
        value: ActivationCode,
        user_id: UserId,
        created_at: DateTime<Utc>,
        expired_at: DateTime<Utc>,
        validated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            value,
            user_id,
            created_at,
            expired_at,
            validated_at,
        }
    }

    pub fn from_new(id: i32, user_id: UserId, token: NewActivationToken) -> Self {
        Self::new(
            id,
            token.value,
            user_id,
            token.created_at,
            token.expired_at,
            None,
        )
    }

    pub fn id(&self) -> i32 {
        self.id
    }
    pub fn value(&self) -> &ActivationCode {
        &self.value
    }
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn expired_at(&self) -> DateTime<Utc> {
        self.expired_at
    }
    pub fn validated_at(&self) -> Option<DateTime<Utc>> {
        self.validated_at
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expired_at
    }

    /// Usable while it has not been consumed and `now < expired_at`.
    pub fn ensure_usable(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_validated() {
            return Err(DomainError::ActivationCodeAlreadyUsed);
        }
        if self.is_expired(now) {
            return Err(DomainError::ActivationCodeExpired);
        }
        Ok(())
    }
}
