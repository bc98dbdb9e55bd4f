use tracing::{info, warn};

use crate::{
    domain::{
        error::DomainError,
        models::{token::ActivationCode, user::Email},
        repositories::{
            token_repository::TokenRepository,
            user_registration_repository::UserRegistrationRepository,
            user_repository::UserRepository,
        },
        services::activation_code_service::ActivationCodeGenerator,
    },
    usecase::activation_issuer::ActivationIssuer,
};

pub struct ActivateAccountUsecase<
    U: UserRepository,
    T: TokenRepository,
    R: UserRegistrationRepository,
    G: ActivationCodeGenerator,
> {
    user_repository: U,
    token_repository: T,
    registration_repository: R,
    issuer: ActivationIssuer<G>,
}

impl<U, T, R, G> ActivateAccountUsecase<U, T, R, G>
where
    U: UserRepository,
    T: TokenRepository,
    R: UserRegistrationRepository,
    G: ActivationCodeGenerator,
{
    pub fn new(
        user_repository: U,
        token_repository: T,
        registration_repository: R,
        issuer: ActivationIssuer<G>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            registration_repository,
            issuer,
        }
    }

    /// Consumes `code` for the account registered under `email`.
    ///
    /// An expired code is answered with a freshly issued one (and its
    /// email) before [`DomainError::ActivationCodeExpired`] is returned.
    /// Only the latest code of an account still awaiting activation earns a
    /// replacement.
    pub async fn activate(&self, email: String, code: String) -> Result<(), DomainError>
    where
        U: Send + Sync,
        T: Send + Sync,
        R: Send + Sync,
    {
        let email = Email::new(email)?;
        let code = ActivationCode::parse(code)?;

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            warn!("activation attempted for unknown account");
            return Err(DomainError::InvalidActivationCode);
        };
        let Some(token) = self.token_repository.find_by_value(user.id(), &code).await? else {
            warn!(user_id = user.id().as_i32(), "activation code does not match");
            return Err(DomainError::InvalidActivationCode);
        };
        if user.enabled() {
            warn!(user_id = user.id().as_i32(), "account is already active");
            return Err(DomainError::ActivationCodeAlreadyUsed);
        }

        let now = self.issuer.now();
        match token.ensure_usable(now) {
            Ok(()) => {}
            Err(DomainError::ActivationCodeExpired) => {
                let latest = self.token_repository.find_latest(user.id()).await?;
                if latest.is_some_and(|latest| latest.id() != token.id()) {
                    warn!(user_id = user.id().as_i32(), "superseded activation code presented");
                    return Err(DomainError::ActivationCodeExpired);
                }
                let (fresh, activation_email) = self.issuer.issue(user.profile())?;
                self.registration_repository
                    .reissue_activation(user.id(), &fresh, &activation_email)
                    .await?;
                info!(user_id = user.id().as_i32(), "activation code expired, new code queued");
                self.issuer.notify_dispatcher();
                return Err(DomainError::ActivationCodeExpired);
            }
            Err(e) => return Err(e),
        }

        // the guarded update loses when a concurrent request consumed it first
        if !self
            .registration_repository
            .activate_user(user.id(), token.id(), now)
            .await?
        {
            return Err(DomainError::ActivationCodeAlreadyUsed);
        }

        info!(user_id = user.id().as_i32(), "account activated");
        Ok(())
    }
}
