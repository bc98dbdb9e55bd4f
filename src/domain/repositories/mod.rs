pub mod outbox_repository;
pub mod role_repository;
pub mod token_repository;
pub mod user_registration_repository;
pub mod user_repository;
