use async_trait::async_trait;

use crate::domain::{error::RepositoryError, models::role::Role};

#[async_trait]
pub trait RoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RepositoryError>;

    /// Insert the role unless one with the same name exists
    async fn ensure_exists(&self, name: &str) -> Result<Role, RepositoryError>;
}
