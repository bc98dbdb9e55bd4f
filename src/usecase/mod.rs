pub mod activate_account_usecase;
pub mod activation_issuer;
pub mod dispatch_outbox_usecase;
pub mod login_usecase;
pub mod register_user_usecase;
