use argon2::{
    Argon2, PasswordHash as Argon2Hash,
    password_hash::{PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::{
    error::DomainError,
    models::credential::{HashedPassword, MIN_PASSWORD_LENGTH},
    services::password_service::PasswordHasher,
};

#[derive(Clone)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        // Validate password strength
        if plain_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::WeakPassword);
        }

        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|_| DomainError::PasswordHashing)?
            .to_string();

        Ok(HashedPassword::new(hash))
    }

    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError> {
        let parsed_hash =
            Argon2Hash::new(hashed_password.as_str()).map_err(|_| DomainError::PasswordHashing)?;

        Ok(Argon2::default()
            .verify_password(plain_password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_one_way_and_verifiable() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("password1").unwrap();

        assert_ne!(hash.as_str(), "password1");
        assert!(hash.as_str().starts_with("$argon2"));
        assert!(hasher.verify("password1", &hash).unwrap());
        assert!(!hasher.verify("password2", &hash).unwrap());
    }

    #[test]
    fn short_password_is_rejected() {
        let hasher = Argon2PasswordHasher::new();
        assert!(matches!(hasher.hash("short"), Err(DomainError::WeakPassword)));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        let result = hasher.verify("password1", &HashedPassword::new("plain".to_string()));
        assert!(matches!(result, Err(DomainError::PasswordHashing)));
    }
}
