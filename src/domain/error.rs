use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Email is already registered")]
    EmailAlreadyRegistered,

    #[error("Role {0} is not initialized")]
    RoleNotInitialized(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Account is not activated")]
    AccountDisabled,

    #[error("Account is locked")]
    AccountLocked,

    #[error("Weak password (minimum 8 characters required)")]
    WeakPassword,

    #[error("Password hashing failed")]
    PasswordHashing,

    #[error("Empty name")]
    EmptyName,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid activation code")]
    InvalidActivationCode,

    #[error("Activation code has already been used")]
    ActivationCodeAlreadyUsed,

    #[error("Activation code has expired, a new one has been sent")]
    ActivationCodeExpired,

    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Failed to issue access token: {0}")]
    AccessToken(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
