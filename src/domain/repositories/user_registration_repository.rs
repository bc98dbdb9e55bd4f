use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    error::RepositoryError,
    models::{
        notification::ActivationEmail,
        token::{ActivationToken, NewActivationToken},
        user::{NewUser, User, UserId},
    },
};

/// Units of work that touch users, tokens and the email outbox together.
///
/// Each method runs in a single transaction: either every row is written or
/// none is.
#[async_trait]
pub trait UserRegistrationRepository {
    /// Insert the user, its role links, the activation token and the
    /// activation email.
    async fn register_user_with_activation(
        &self,
        user: NewUser,
        token: &NewActivationToken,
        email: &ActivationEmail,
    ) -> Result<(User, ActivationToken), RepositoryError>;

    /// Store a replacement token and queue its email.
    async fn reissue_activation(
        &self,
        user_id: UserId,
        token: &NewActivationToken,
        email: &ActivationEmail,
    ) -> Result<ActivationToken, RepositoryError>;

    /// Mark the token validated and enable the user.
    ///
    /// Returns `false` when the token was already consumed, in which case
    /// nothing is changed.
    async fn activate_user(
        &self,
        user_id: UserId,
        token_id: i32,
        validated_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}
