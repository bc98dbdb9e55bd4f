use async_trait::async_trait;
use chrono::Utc;
use entity::roles;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::{
    domain::{error::RepositoryError, models::role::Role, repositories::role_repository::RoleRepository},
    infrastructure::map_db_err,
};

#[derive(Clone)]
pub struct PostgresRoleRepository {
    db: DatabaseConnection,
}

impl PostgresRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RepositoryError> {
        let role = roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(role.map(|model| Role::new(model.id, model.name)))
    }

    async fn ensure_exists(&self, name: &str) -> Result<Role, RepositoryError> {
        if let Some(role) = self.find_by_name(name).await? {
            return Ok(role);
        }

        let inserted = roles::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err);

        match inserted {
            Ok(model) => Ok(Role::new(model.id, model.name)),
            // another instance seeded it first
            Err(RepositoryError::Conflict(_)) => self
                .find_by_name(name)
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(e),
        }
    }
}
