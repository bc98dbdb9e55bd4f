//! Fakes and fixtures shared by unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use mockable::Clock;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::domain::{
    error::{DomainError, NotificationError, RepositoryError},
    models::{
        credential::{HashedPassword, MIN_PASSWORD_LENGTH},
        notification::{ActivationEmail, OutboxMessage},
        role::Role,
        token::{ActivationCode, ActivationToken, NewActivationToken},
        user::{Email, NewUser, User, UserId},
    },
    repositories::{
        outbox_repository::OutboxRepository, role_repository::RoleRepository,
        token_repository::TokenRepository,
        user_registration_repository::UserRegistrationRepository,
        user_repository::UserRepository,
    },
    services::{
        activation_code_service::ActivationCodeGenerator, auditor_service::AuditorProvider,
        notification_service::NotificationSink, password_service::PasswordHasher,
    },
};

/// In-memory SQLite database with every migration applied.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // one connection, otherwise each pooled connection gets its own database
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct MutableClock(Arc<Mutex<DateTime<Utc>>>);

impl MutableClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub struct FixedAuditor(pub &'static str);

impl AuditorProvider for FixedAuditor {
    fn current_auditor(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Hands out the queued codes in order, then repeats the last one.
#[derive(Clone)]
pub struct QueuedCodeGenerator(Arc<Mutex<VecDeque<String>>>);

impl QueuedCodeGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self(Arc::new(Mutex::new(
            codes.iter().map(|c| c.to_string()).collect(),
        )))
    }
}

impl ActivationCodeGenerator for QueuedCodeGenerator {
    fn generate(&self, length: usize) -> Result<String, DomainError> {
        let mut codes = self.0.lock().unwrap();
        let code = if codes.len() > 1 {
            codes.pop_front().unwrap()
        } else {
            codes.front().cloned().unwrap()
        };
        assert_eq!(code.len(), length);
        Ok(code)
    }
}

#[derive(Clone)]
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        if plain_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::WeakPassword);
        }
        Ok(HashedPassword::new(format!("hashed:{plain_password}")))
    }

    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError> {
        Ok(hashed_password.as_str() == format!("hashed:{plain_password}"))
    }
}

/// Records delivered emails; fails the first `failures` calls.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub sent: Arc<Mutex<Vec<ActivationEmail>>>,
    failures: Arc<Mutex<usize>>,
}

impl RecordingSink {
    pub fn failing(failures: usize) -> Self {
        Self {
            sent: Arc::default(),
            failures: Arc::new(Mutex::new(failures)),
        }
    }

    pub fn sent(&self) -> Vec<ActivationEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send_email(&self, email: &ActivationEmail) -> Result<(), NotificationError> {
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(NotificationError::Delivery("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StoredOutboxMessage {
    pub message: OutboxMessage,
    pub sent_at: Option<DateTime<Utc>>,
    pub next_attempt_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Default)]
pub struct StoreState {
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub tokens: Vec<ActivationToken>,
    pub outbox: Vec<StoredOutboxMessage>,
    pub fail_token_writes: bool,
}

/// In-memory stand-in for every repository; writes through
/// [`UserRegistrationRepository`] are all-or-nothing like the SQL adapter.
#[derive(Clone, Default)]
pub struct InMemoryStore(pub Arc<Mutex<StoreState>>);

impl InMemoryStore {
    pub fn with_default_role() -> Self {
        let store = Self::default();
        store.state().roles.push(Role::new(1, "USER".to_string()));
        store
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.0.lock().unwrap()
    }

    fn queue(state: &mut StoreState, email: &ActivationEmail, now: DateTime<Utc>) {
        let id = i32::try_from(state.outbox.len()).unwrap() + 1;
        state.outbox.push(StoredOutboxMessage {
            message: OutboxMessage {
                id,
                email: email.clone(),
                attempts: 0,
            },
            sent_at: None,
            next_attempt_at: Some(now),
            last_error: None,
        });
    }

    fn next_token_id(state: &StoreState) -> i32 {
        i32::try_from(state.tokens.len()).unwrap() + 1
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RepositoryError> {
        Ok(self.state().roles.iter().find(|r| r.name() == name).cloned())
    }

    async fn ensure_exists(&self, name: &str) -> Result<Role, RepositoryError> {
        let mut state = self.state();
        if let Some(role) = state.roles.iter().find(|r| r.name() == name) {
            return Ok(role.clone());
        }
        let role = Role::new(i32::try_from(state.roles.len()).unwrap() + 1, name.to_string());
        state.roles.push(role.clone());
        Ok(role)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self.state().users.iter().find(|u| u.email() == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state().users.iter().find(|u| u.id() == id).cloned())
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn save(
        &self,
        user_id: UserId,
        token: &NewActivationToken,
    ) -> Result<ActivationToken, RepositoryError> {
        let mut state = self.state();
        if state.fail_token_writes {
            return Err(RepositoryError::DatabaseError("tokens unavailable".to_string()));
        }
        let stored = ActivationToken::from_new(Self::next_token_id(&state), user_id, token.clone());
        state.tokens.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_value(
        &self,
        user_id: UserId,
        value: &ActivationCode,
    ) -> Result<Option<ActivationToken>, RepositoryError> {
        Ok(self
            .state()
            .tokens
            .iter()
            .find(|t| t.user_id() == user_id && t.value() == value)
            .cloned())
    }

    async fn find_latest(
        &self,
        user_id: UserId,
    ) -> Result<Option<ActivationToken>, RepositoryError> {
        Ok(self
            .state()
            .tokens
            .iter()
            .filter(|t| t.user_id() == user_id)
            .max_by_key(|t| (t.created_at(), t.id()))
            .cloned())
    }
}

#[async_trait]
impl UserRegistrationRepository for InMemoryStore {
    async fn register_user_with_activation(
        &self,
        user: NewUser,
        token: &NewActivationToken,
        email: &ActivationEmail,
    ) -> Result<(User, ActivationToken), RepositoryError> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email() == user.profile().email()) {
            return Err(RepositoryError::Conflict("users.email".to_string()));
        }
        if state.fail_token_writes {
            return Err(RepositoryError::DatabaseError("tokens unavailable".to_string()));
        }

        let user_id = UserId::new(i32::try_from(state.users.len()).unwrap() + 1);
        let user = User::from_new(user_id, user);
        let stored = ActivationToken::from_new(Self::next_token_id(&state), user_id, token.clone());
        state.users.push(user.clone());
        state.tokens.push(stored.clone());
        Self::queue(&mut state, email, token.created_at());
        Ok((user, stored))
    }

    async fn reissue_activation(
        &self,
        user_id: UserId,
        token: &NewActivationToken,
        email: &ActivationEmail,
    ) -> Result<ActivationToken, RepositoryError> {
        let mut state = self.state();
        if state.fail_token_writes {
            return Err(RepositoryError::DatabaseError("tokens unavailable".to_string()));
        }
        let stored = ActivationToken::from_new(Self::next_token_id(&state), user_id, token.clone());
        state.tokens.push(stored.clone());
        Self::queue(&mut state, email, token.created_at());
        Ok(stored)
    }

    async fn activate_user(
        &self,
        user_id: UserId,
        token_id: i32,
        validated_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.state();
        let Some(index) = state
            .tokens
            .iter()
            .position(|t| t.id() == token_id && t.user_id() == user_id)
        else {
            return Err(RepositoryError::NotFound);
        };
        if state.tokens[index].is_validated() {
            return Ok(false);
        }

        let token = state.tokens[index].clone();
        state.tokens[index] = ActivationToken::new(
            token.id(),
            token.value().clone(),
            token.user_id(),
            token.created_at(),
            token.expired_at(),
            Some(validated_at),
        );
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id() == user_id)
            .ok_or(RepositoryError::NotFound)?;
        *user = User::new(
            user.id(),
            user.profile().clone(),
            user.password_hash().clone(),
            user.account_locked(),
            true,
            user.roles().to_vec(),
        );
        Ok(true)
    }
}

#[async_trait]
impl OutboxRepository for InMemoryStore {
    async fn fetch_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<OutboxMessage>, RepositoryError> {
        Ok(self
            .state()
            .outbox
            .iter()
            .filter(|m| m.sent_at.is_none() && m.next_attempt_at.is_some_and(|at| at <= now))
            .take(usize::try_from(limit).unwrap())
            .map(|m| m.message.clone())
            .collect())
    }

    async fn mark_sent(&self, id: i32, sent_at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut state = self.state();
        let entry = state
            .outbox
            .iter_mut()
            .find(|m| m.message.id == id)
            .ok_or(RepositoryError::NotFound)?;
        entry.message.attempts += 1;
        entry.sent_at = Some(sent_at);
        entry.last_error = None;
        Ok(())
    }

    async fn record_failure(
        &self,
        id: i32,
        attempts: i32,
        error: &str,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state();
        let entry = state
            .outbox
            .iter_mut()
            .find(|m| m.message.id == id)
            .ok_or(RepositoryError::NotFound)?;
        entry.message.attempts = attempts;
        entry.last_error = Some(error.to_string());
        entry.next_attempt_at = next_attempt_at;
        Ok(())
    }
}
