use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::{
        token::{ActivationCode, ActivationToken, NewActivationToken},
        user::UserId,
    },
};

/// Durable storage for activation tokens.
///
/// Token values are short numeric codes and are only unique per user, so
/// every lookup is scoped to the owning user.
#[async_trait]
pub trait TokenRepository {
    async fn save(
        &self,
        user_id: UserId,
        token: &NewActivationToken,
    ) -> Result<ActivationToken, RepositoryError>;

    async fn find_by_value(
        &self,
        user_id: UserId,
        value: &ActivationCode,
    ) -> Result<Option<ActivationToken>, RepositoryError>;

    /// The most recently issued token for `user_id`, used or not.
    async fn find_latest(&self, user_id: UserId)
    -> Result<Option<ActivationToken>, RepositoryError>;
}
