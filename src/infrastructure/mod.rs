pub mod argon2_password_hasher;
pub mod brevo_notification_sink;
pub mod email_template;
pub mod jwt_token_generator;
pub mod log_notification_sink;
pub mod os_rng_code_generator;
pub mod outbox_repository;
pub mod role_repository;
pub mod static_auditor;
pub mod token_repository;
pub mod user_registration_repository;
pub mod user_repository;

use sea_orm::{DbErr, SqlErr};

use crate::domain::error::RepositoryError;

/// Unique-key violations become [`RepositoryError::Conflict`], everything else
/// is an opaque database error.
pub(crate) fn map_db_err(e: DbErr) -> RepositoryError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepositoryError::Conflict(detail),
        _ => RepositoryError::DatabaseError(e.to_string()),
    }
}
