use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::error::{DomainError, RepositoryError};

/// json body for every failed request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    pub fn validation(errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: "Validation failed".to_string(),
                validation_errors: errors,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                validation_errors: Vec::new(),
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmptyName
            | DomainError::InvalidEmail
            | DomainError::WeakPassword
            | DomainError::InvalidActivationCode
            | DomainError::ActivationCodeAlreadyUsed => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            DomainError::AuthenticationFailed => Self::new(StatusCode::UNAUTHORIZED, e.to_string()),
            DomainError::AccountDisabled | DomainError::AccountLocked => {
                Self::new(StatusCode::FORBIDDEN, e.to_string())
            }
            DomainError::ActivationCodeExpired => Self::new(StatusCode::GONE, e.to_string()),
            DomainError::EmailAlreadyRegistered => Self::new(StatusCode::CONFLICT, e.to_string()),
            DomainError::Repository(RepositoryError::Conflict(ref detail)) => {
                warn!(detail = %detail, "write conflicted with existing data");
                Self::new(StatusCode::CONFLICT, "Request conflicts with existing data")
            }
            DomainError::Repository(_)
            | DomainError::RoleNotInitialized(_)
            | DomainError::PasswordHashing
            | DomainError::EntropyUnavailable(_)
            | DomainError::AccessToken(_) => {
                error!(error = %e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
