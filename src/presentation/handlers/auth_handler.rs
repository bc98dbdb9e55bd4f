use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        models::credential::MIN_PASSWORD_LENGTH,
        repositories::{
            role_repository::RoleRepository, token_repository::TokenRepository,
            user_registration_repository::UserRegistrationRepository,
            user_repository::UserRepository,
        },
        services::{
            access_token_service::AccessTokenGenerator,
            activation_code_service::ActivationCodeGenerator, password_service::PasswordHasher,
        },
    },
    presentation::{
        error::ApiError,
        validation::{Validate, check_email, check_mandatory, is_blank},
    },
    usecase::{
        activate_account_usecase::ActivateAccountUsecase,
        login_usecase::LoginUsecase,
        register_user_usecase::{RegisterUserUsecase, RegistrationCommand},
    },
};

// Request

/// json for register request
///
/// Missing fields deserialize as empty so they are reported as violations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastname", default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for RegistrationRequest {
    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        check_mandatory(&self.first_name, "First name is mandatory", &mut violations);
        check_mandatory(&self.last_name, "Last name is mandatory", &mut violations);
        check_email(&self.email, &mut violations);
        if is_blank(&self.password) {
            violations.push("Password is mandatory".to_string());
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            violations.push(format!(
                "Password should be {MIN_PASSWORD_LENGTH} characters long minimum"
            ));
        }
        violations
    }
}

/// json for account activation request
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ActivationRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

impl Validate for ActivationRequest {
    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        check_email(&self.email, &mut violations);
        check_mandatory(&self.token, "Activation code is mandatory", &mut violations);
        violations
    }
}

/// json for login request
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuthenticationRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for AuthenticationRequest {
    fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        check_email(&self.email, &mut violations);
        check_mandatory(&self.password, "Password is mandatory", &mut violations);
        violations
    }
}

// Response

/// json for login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    pub token: String,
}

/* Router Function and Handler Function */

/// Routes under `/auth`. Suppose to be nested by main router
pub fn create_auth_router<Ro, U, T, R, P, G, J>(
    register_service: RegisterUserUsecase<Ro, R, P, G>,
    activate_service: ActivateAccountUsecase<U, T, R, G>,
    login_service: LoginUsecase<U, P, J>,
) -> Router
where
    Ro: RoleRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TokenRepository + Send + Sync + 'static,
    R: UserRegistrationRepository + Send + Sync + 'static,
    P: PasswordHasher + 'static,
    G: ActivationCodeGenerator + 'static,
    J: AccessTokenGenerator + 'static,
{
    let register_routes = Router::new()
        .route("/auth/register", post(register::<Ro, R, P, G>))
        .with_state(Arc::new(register_service));
    let activate_routes = Router::new()
        .route("/auth/activate-account", post(activate::<U, T, R, G>))
        .with_state(Arc::new(activate_service));
    let login_routes = Router::new()
        .route("/auth/authenticate", post(authenticate::<U, P, J>))
        .with_state(Arc::new(login_service));

    register_routes.merge(activate_routes).merge(login_routes)
}

// handler function

/// handler function for register
async fn register<Ro, R, P, G>(
    State(service): State<Arc<RegisterUserUsecase<Ro, R, P, G>>>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<StatusCode, ApiError>
where
    Ro: RoleRepository + Send + Sync,
    R: UserRegistrationRepository + Send + Sync,
    P: PasswordHasher,
    G: ActivationCodeGenerator,
{
    payload.validate().map_err(ApiError::validation)?;
    service
        .register(RegistrationCommand {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
        })
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// handler function for account activation
async fn activate<U, T, R, G>(
    State(service): State<Arc<ActivateAccountUsecase<U, T, R, G>>>,
    Json(payload): Json<ActivationRequest>,
) -> Result<StatusCode, ApiError>
where
    U: UserRepository + Send + Sync,
    T: TokenRepository + Send + Sync,
    R: UserRegistrationRepository + Send + Sync,
    G: ActivationCodeGenerator,
{
    payload.validate().map_err(ApiError::validation)?;
    service.activate(payload.email, payload.token).await?;
    Ok(StatusCode::OK)
}

/// handler function for login
async fn authenticate<U, P, J>(
    State(service): State<Arc<LoginUsecase<U, P, J>>>,
    Json(payload): Json<AuthenticationRequest>,
) -> Result<Json<AuthenticationResponse>, ApiError>
where
    U: UserRepository + Send + Sync,
    P: PasswordHasher,
    J: AccessTokenGenerator,
{
    payload.validate().map_err(ApiError::validation)?;
    let result = service.login(payload.email, payload.password).await?;
    Ok(Json(AuthenticationResponse {
        token: result.token,
    }))
}
