use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    models::{credential::HashedPassword, role::Role},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i32);
impl UserId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);
impl Email {
    /// Accepts `local@domain.tld` shaped addresses. The value is kept verbatim.
    pub fn new(value: String) -> Result<Self, DomainError> {
        if !is_valid_email(&value) {
            return Err(DomainError::InvalidEmail);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    first_name: String,
    last_name: String,
    email: Email,
}

impl UserProfile {
    pub fn new(first_name: String, last_name: String, email: Email) -> Result<Self, DomainError> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(Self {
            first_name,
            last_name,
            email,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name used in greetings
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user that has not been persisted yet.
///
/// Registration always produces an unlocked, disabled account; it is enabled
/// later by consuming an activation token.
#[derive(Debug, Clone)]
pub struct NewUser {
    profile: UserProfile,
    password_hash: HashedPassword,
    roles: Vec<Role>,
    created_by: Option<String>,
}

impl NewUser {
    pub fn new(
        profile: UserProfile,
        password_hash: HashedPassword,
        role: Role,
        created_by: Option<String>,
    ) -> Self {
        Self {
            profile,
            password_hash,
            roles: vec![role],
            created_by,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn account_locked(&self) -> bool {
        false
    }
    pub fn enabled(&self) -> bool {
        false
    }
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    profile: UserProfile,
    password_hash: HashedPassword,
    account_locked: bool,
    enabled: bool,
    roles: Vec<String>,
}

impl User {
    pub fn new(
        id: UserId,
        profile: UserProfile,
        password_hash: HashedPassword,
        account_locked: bool,
        enabled: bool,
        roles: Vec<String>,
    ) -> Self {
        Self {
            id,
            profile,
            password_hash,
            account_locked,
            enabled,
            roles,
        }
    }

    /// Identity assigned by the store for a freshly inserted [`NewUser`].
    pub fn from_new(id: UserId, user: NewUser) -> Self {
        let account_locked = user.account_locked();
        let enabled = user.enabled();
        Self {
            id,
            profile: user.profile,
            password_hash: user.password_hash,
            account_locked,
            enabled,
            roles: user.roles.iter().map(|r| r.name().to_string()).collect(),
        }
    }

    // getters only
    pub fn id(&self) -> UserId {
        self.id
    }
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }
    pub fn email(&self) -> &Email {
        self.profile.email()
    }
    pub fn full_name(&self) -> String {
        self.profile.full_name()
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn account_locked(&self) -> bool {
        self.account_locked
    }
    pub fn enabled(&self) -> bool {
        self.enabled
    }
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}
