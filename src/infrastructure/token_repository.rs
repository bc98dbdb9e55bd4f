use async_trait::async_trait;
use entity::tokens;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            token::{ActivationCode, ActivationToken, NewActivationToken},
            user::UserId,
        },
        repositories::token_repository::TokenRepository,
    },
    infrastructure::map_db_err,
};

#[derive(Clone)]
pub struct PostgresTokenRepository {
    db: DatabaseConnection,
}

impl PostgresTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) async fn insert_token<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    token: &NewActivationToken,
) -> Result<tokens::Model, DbErr> {
    tokens::ActiveModel {
        token: Set(token.value().as_str().to_string()),
        created_at: Set(token.created_at()),
        expired_at: Set(token.expired_at()),
        validated_at: Set(None),
        user_id: Set(user_id.as_i32()),
        ..Default::default()
    }
    .insert(conn)
    .await
}

pub(crate) fn token_from_model(model: tokens::Model) -> Result<ActivationToken, RepositoryError> {
    let value = ActivationCode::parse(model.token)
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    Ok(ActivationToken::new(
        model.id,
        value,
        UserId::new(model.user_id),
        model.created_at,
        model.expired_at,
        model.validated_at,
    ))
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn save(
        &self,
        user_id: UserId,
        token: &NewActivationToken,
    ) -> Result<ActivationToken, RepositoryError> {
        let model = insert_token(&self.db, user_id, token)
            .await
            .map_err(map_db_err)?;
        token_from_model(model)
    }

    async fn find_by_value(
        &self,
        user_id: UserId,
        value: &ActivationCode,
    ) -> Result<Option<ActivationToken>, RepositoryError> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::UserId.eq(user_id.as_i32()))
            .filter(tokens::Column::Token.eq(value.as_str()))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        model.map(token_from_model).transpose()
    }

    async fn find_latest(
        &self,
        user_id: UserId,
    ) -> Result<Option<ActivationToken>, RepositoryError> {
        let model = tokens::Entity::find()
            .filter(tokens::Column::UserId.eq(user_id.as_i32()))
            .order_by_desc(tokens::Column::CreatedAt)
            .order_by_desc(tokens::Column::Id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        model.map(token_from_model).transpose()
    }
}
