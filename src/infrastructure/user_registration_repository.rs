use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entity::{tokens, user_roles, users};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait, sea_query::Expr,
};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            notification::ActivationEmail,
            token::{ActivationToken, NewActivationToken},
            user::{NewUser, User, UserId},
        },
        repositories::user_registration_repository::UserRegistrationRepository,
    },
    infrastructure::{
        map_db_err,
        outbox_repository::insert_outbox_message,
        token_repository::{insert_token, token_from_model},
    },
};

#[derive(Clone)]
pub struct PostgresUserRegistrationRepository {
    db: DatabaseConnection,
}

impl PostgresUserRegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRegistrationRepository for PostgresUserRegistrationRepository {
    async fn register_user_with_activation(
        &self,
        user: NewUser,
        token: &NewActivationToken,
        email: &ActivationEmail,
    ) -> Result<(User, ActivationToken), RepositoryError> {
        // Begin transaction; dropping it on any early return rolls back
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let now = token.created_at();
        let profile = user.profile();

        // Insert user
        let user_model = users::ActiveModel {
            first_name: Set(profile.first_name().to_string()),
            last_name: Set(profile.last_name().to_string()),
            email: Set(profile.email().as_str().to_string()),
            password_hash: Set(user.password_hash().as_str().to_string()),
            account_locked: Set(user.account_locked()),
            enabled: Set(user.enabled()),
            created_at: Set(now),
            updated_at: Set(now),
            created_by: Set(user.created_by().map(str::to_string)),
            last_modified_by: Set(user.created_by().map(str::to_string)),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;
        let user_id = UserId::new(user_model.id);

        // Link roles
        if !user.roles().is_empty() {
            let links = user.roles().iter().map(|role| user_roles::ActiveModel {
                user_id: Set(user_model.id),
                role_id: Set(role.id()),
            });
            user_roles::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        // Insert token and queue its email
        let token_model = insert_token(&txn, user_id, token)
            .await
            .map_err(map_db_err)?;
        insert_outbox_message(&txn, email, now)
            .await
            .map_err(map_db_err)?;

        // Commit transaction
        txn.commit().await.map_err(map_db_err)?;

        Ok((User::from_new(user_id, user), token_from_model(token_model)?))
    }

    async fn reissue_activation(
        &self,
        user_id: UserId,
        token: &NewActivationToken,
        email: &ActivationEmail,
    ) -> Result<ActivationToken, RepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let token_model = insert_token(&txn, user_id, token)
            .await
            .map_err(map_db_err)?;
        insert_outbox_message(&txn, email, token.created_at())
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        token_from_model(token_model)
    }

    async fn activate_user(
        &self,
        user_id: UserId,
        token_id: i32,
        validated_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // the null guard makes a concurrent second activation a no-op
        let consumed = tokens::Entity::update_many()
            .col_expr(tokens::Column::ValidatedAt, Expr::value(validated_at))
            .filter(tokens::Column::Id.eq(token_id))
            .filter(tokens::Column::UserId.eq(user_id.as_i32()))
            .filter(tokens::Column::ValidatedAt.is_null())
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if consumed.rows_affected == 0 {
            return Ok(false);
        }

        let enabled = users::Entity::update_many()
            .col_expr(users::Column::Enabled, Expr::value(true))
            .col_expr(users::Column::UpdatedAt, Expr::value(validated_at))
            .filter(users::Column::Id.eq(user_id.as_i32()))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if enabled.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(true)
    }
}
