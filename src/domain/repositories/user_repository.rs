use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::user::{Email, User, UserId},
};

#[async_trait]
pub trait UserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}
