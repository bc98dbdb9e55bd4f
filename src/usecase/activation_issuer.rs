use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use tokio::sync::Notify;

use crate::domain::{
    error::DomainError,
    models::{
        notification::ActivationEmail,
        token::{ACTIVATION_CODE_LENGTH, ActivationCode, NewActivationToken},
        user::UserProfile,
    },
    services::activation_code_service::ActivationCodeGenerator,
};

/// Builds activation tokens and their emails, and wakes the outbox
/// dispatcher once they are committed.
pub struct ActivationIssuer<G: ActivationCodeGenerator> {
    code_generator: G,
    clock: Arc<dyn Clock + Send + Sync>,
    activation_url: String,
    dispatch_trigger: Arc<Notify>,
}

impl<G: ActivationCodeGenerator> ActivationIssuer<G> {
    pub fn new(
        code_generator: G,
        clock: Arc<dyn Clock + Send + Sync>,
        activation_url: String,
        dispatch_trigger: Arc<Notify>,
    ) -> Self {
        Self {
            code_generator,
            clock,
            activation_url,
            dispatch_trigger,
        }
    }

    /// Current time at the precision the database stores.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }

    pub fn issue(
        &self,
        profile: &UserProfile,
    ) -> Result<(NewActivationToken, ActivationEmail), DomainError> {
        let code = ActivationCode::parse(self.code_generator.generate(ACTIVATION_CODE_LENGTH)?)?;
        let token = NewActivationToken::issue(code, self.now());
        let email = ActivationEmail::new(
            profile.email().as_str(),
            profile.full_name(),
            &self.activation_url,
            token.value(),
        );
        Ok((token, email))
    }

    pub fn notify_dispatcher(&self) {
        self.dispatch_trigger.notify_one();
    }
}
