use async_trait::async_trait;
use entity::{roles, users};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            credential::HashedPassword,
            user::{Email, User, UserId, UserProfile},
        },
        repositories::user_repository::UserRepository,
    },
    infrastructure::map_db_err,
};

#[derive(Clone)]
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_one(&self, query: Select<users::Entity>) -> Result<Option<User>, RepositoryError> {
        let found = query
            .find_with_related(roles::Entity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        match found.into_iter().next() {
            Some((model, roles)) => Ok(Some(user_from_model(model, roles)?)),
            None => Ok(None),
        }
    }
}

/// Rebuild the domain user from its row and linked roles
pub(crate) fn user_from_model(
    model: users::Model,
    roles: Vec<roles::Model>,
) -> Result<User, RepositoryError> {
    let email = Email::new(model.email).map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
    let profile = UserProfile::new(model.first_name, model.last_name, email)
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    Ok(User::new(
        UserId::new(model.id),
        profile,
        HashedPassword::new(model.password_hash),
        model.account_locked,
        model.enabled,
        roles.into_iter().map(|role| role.name).collect(),
    ))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        self.find_one(users::Entity::find().filter(users::Column::Email.eq(email.as_str())))
            .await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.find_one(users::Entity::find_by_id(id.as_i32())).await
    }
}
