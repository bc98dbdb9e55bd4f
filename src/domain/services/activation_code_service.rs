use crate::domain::error::DomainError;

/// Source of activation codes.
///
/// Implementations return `length` decimal digits, each drawn uniformly and
/// independently from a cryptographically secure source. A failing entropy
/// source is reported as [`DomainError::EntropyUnavailable`].
pub trait ActivationCodeGenerator: Send + Sync {
    fn generate(&self, length: usize) -> Result<String, DomainError>;
}
