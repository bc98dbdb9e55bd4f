use std::sync::Arc;

use tracing::{error, info};

use crate::{
    domain::{
        error::{DomainError, RepositoryError},
        models::{
            role::DEFAULT_ROLE,
            user::{Email, NewUser, UserProfile},
        },
        repositories::{
            role_repository::RoleRepository,
            user_registration_repository::UserRegistrationRepository,
        },
        services::{
            activation_code_service::ActivationCodeGenerator, auditor_service::AuditorProvider,
            password_service::PasswordHasher,
        },
    },
    usecase::activation_issuer::ActivationIssuer,
};

#[derive(Debug, Clone)]
pub struct RegistrationCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUserUsecase<
    Ro: RoleRepository,
    R: UserRegistrationRepository,
    P: PasswordHasher,
    G: ActivationCodeGenerator,
> {
    role_repository: Ro,
    registration_repository: R,
    password_hasher: P,
    issuer: ActivationIssuer<G>,
    auditor: Arc<dyn AuditorProvider>,
}

impl<Ro, R, P, G> RegisterUserUsecase<Ro, R, P, G>
where
    Ro: RoleRepository,
    R: UserRegistrationRepository,
    P: PasswordHasher,
    G: ActivationCodeGenerator,
{
    pub fn new(
        role_repository: Ro,
        registration_repository: R,
        password_hasher: P,
        issuer: ActivationIssuer<G>,
        auditor: Arc<dyn AuditorProvider>,
    ) -> Self {
        Self {
            role_repository,
            registration_repository,
            password_hasher,
            issuer,
            auditor,
        }
    }

    /// Creates a disabled account holding the default role, stores an
    /// activation token and queues the activation email, all in one
    /// transaction. Delivery happens later through the outbox.
    pub async fn register(&self, command: RegistrationCommand) -> Result<(), DomainError>
    where
        Ro: Send + Sync,
        R: Send + Sync,
    {
        let role = match self.role_repository.find_by_name(DEFAULT_ROLE).await? {
            Some(role) => role,
            None => {
                error!(role = DEFAULT_ROLE, "default role is missing, registration refused");
                return Err(DomainError::RoleNotInitialized(DEFAULT_ROLE.to_string()));
            }
        };

        let email = Email::new(command.email)?;
        let profile = UserProfile::new(command.first_name, command.last_name, email)?;
        let password_hash = self.password_hasher.hash(&command.password)?;
        let (token, activation_email) = self.issuer.issue(&profile)?;
        let user = NewUser::new(profile, password_hash, role, self.auditor.current_auditor());

        let (user, _) = self
            .registration_repository
            .register_user_with_activation(user, &token, &activation_email)
            .await
            .map_err(|e| match e {
                // a brand new user owns no tokens, so only the email index can clash
                RepositoryError::Conflict(_) => DomainError::EmailAlreadyRegistered,
                e => DomainError::Repository(e),
            })?;

        info!(user_id = user.id().as_i32(), "user registered, activation email queued");
        self.issuer.notify_dispatcher();
        Ok(())
    }
}
