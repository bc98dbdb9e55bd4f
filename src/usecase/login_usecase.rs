use tracing::{info, warn};

use crate::domain::{
    error::DomainError,
    models::user::{Email, User},
    repositories::user_repository::UserRepository,
    services::{
        access_token_service::{AccessToken, AccessTokenGenerator},
        password_service::PasswordHasher,
    },
};

#[derive(Debug)]
pub struct LoginResult {
    pub token: AccessToken,
    pub user: User,
}

pub struct LoginUsecase<U: UserRepository, P: PasswordHasher, J: AccessTokenGenerator> {
    user_repository: U,
    password_hasher: P,
    token_generator: J,
}

impl<U: UserRepository, P: PasswordHasher, J: AccessTokenGenerator> LoginUsecase<U, P, J> {
    pub fn new(user_repository: U, password_hasher: P, token_generator: J) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_generator,
        }
    }

    /// Unknown accounts and wrong passwords are indistinguishable to the
    /// caller. Account state is only reported once the password matched.
    pub async fn login(&self, email: String, password: String) -> Result<LoginResult, DomainError>
    where
        U: Send + Sync,
    {
        let email = Email::new(email).map_err(|_| DomainError::AuthenticationFailed)?;
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::AuthenticationFailed)?;

        if !self.password_hasher.verify(&password, user.password_hash())? {
            warn!(user_id = user.id().as_i32(), "wrong password");
            return Err(DomainError::AuthenticationFailed);
        }
        if user.account_locked() {
            return Err(DomainError::AccountLocked);
        }
        if !user.enabled() {
            return Err(DomainError::AccountDisabled);
        }

        let token = self.token_generator.generate(&user)?;
        info!(user_id = user.id().as_i32(), "user authenticated");
        Ok(LoginResult { token, user })
    }
}
