pub use sea_orm_migration::prelude::*;

mod m20240601_000001_users_and_roles;
mod m20240601_000002_tokens;
mod m20240601_000003_email_outbox;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_users_and_roles::Migration),
            Box::new(m20240601_000002_tokens::Migration),
            Box::new(m20240601_000003_email_outbox::Migration),
        ]
    }
}
