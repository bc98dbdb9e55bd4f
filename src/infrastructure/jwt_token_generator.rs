use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    models::user::User,
    services::access_token_service::{AccessToken, AccessTokenGenerator},
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    sub: String,              // Subject (email)
    full_name: String,        // Display name
    authorities: Vec<String>, // Role names
    exp: i64,                 // Expiration time
    iat: i64,                 // Issued at
}

#[derive(Clone)]
pub struct JwtTokenGenerator {
    secret: String,
    expiration_hours: i64,
}

impl JwtTokenGenerator {
    pub fn with_expiration(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }
}

impl AccessTokenGenerator for JwtTokenGenerator {
    fn generate(&self, user: &User) -> Result<AccessToken, DomainError> {
        let now = Utc::now();
        let exp = Duration::try_hours(self.expiration_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                DomainError::AccessToken(format!(
                    "expiration of {} hours is out of range",
                    self.expiration_hours
                ))
            })?;

        let claims = Claims {
            sub: user.email().as_str().to_string(),
            full_name: user.full_name(),
            authorities: user.roles().to_vec(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DomainError::AccessToken(e.to_string()))
    }
}
