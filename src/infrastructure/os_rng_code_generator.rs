use rand_core::{OsRng, TryRngCore};

use crate::domain::{error::DomainError, services::activation_code_service::ActivationCodeGenerator};

/// Bytes at or above this bound are discarded so that `byte % 10` is uniform.
const REJECTION_BOUND: u8 = 250;

#[derive(Clone, Default)]
pub struct OsRngCodeGenerator;

impl OsRngCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ActivationCodeGenerator for OsRngCodeGenerator {
    fn generate(&self, length: usize) -> Result<String, DomainError> {
        let mut code = String::with_capacity(length);
        let mut buf = [0u8; 16];

        while code.len() < length {
            OsRng
                .try_fill_bytes(&mut buf)
                .map_err(|e| DomainError::EntropyUnavailable(e.to_string()))?;

            for byte in buf.iter().copied().filter(|b| *b < REJECTION_BOUND) {
                if code.len() == length {
                    break;
                }
                code.push(char::from(b'0' + byte % 10));
            }
        }

        Ok(code)
    }
}
