use crate::domain::{error::DomainError, models::user::User};

pub type AccessToken = String;

/// Issues bearer tokens for authenticated, activated users
pub trait AccessTokenGenerator: Send + Sync {
    fn generate(&self, user: &User) -> Result<AccessToken, DomainError>;
}
