//! Password policy validation for the renew-password flow.

use crate::error::CoreError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a new password against the account password policy.
///
/// Requires at least [`MIN_PASSWORD_LENGTH`] characters, at least one
/// letter, and rejects all-digit passwords.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "Password cannot consist of digits only".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err(CoreError::Validation(
            "Password must contain at least one letter".to_string(),
        ));
    }
    Ok(())
}
