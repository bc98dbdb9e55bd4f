use crate::domain::models::user::Email;

/// Request bodies that check their own fields before reaching a use case.
pub trait Validate {
    /// Every violated rule, in field order.
    fn violations(&self) -> Vec<String>;

    fn validate(&self) -> Result<(), Vec<String>> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Mandatory field that must also look like an email address.
pub fn check_email(value: &str, violations: &mut Vec<String>) {
    if is_blank(value) {
        violations.push("Email is mandatory".to_string());
    } else if Email::new(value.to_string()).is_err() {
        violations.push("Email is not well formatted".to_string());
    }
}

pub fn check_mandatory(value: &str, message: &str, violations: &mut Vec<String>) {
    if is_blank(value) {
        violations.push(message.to_string());
    }
}
