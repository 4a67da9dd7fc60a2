//! Client-side checks run before credentials reach the identity provider.
//!
//! The provider validates again on its side; these checks only catch the
//! obvious mistakes early with a friendlier message.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Please fill in all fields to continue.")]
    MissingFields,
    #[error("Please enter a valid email address (e.g., user@example.com).")]
    InvalidEmail,
    #[error("Password must be at least 6 characters long for security.")]
    PasswordTooShort,
    #[error("Passwords do not match. Please make sure both passwords are identical.")]
    PasswordMismatch,
    #[error("Password should contain at least one letter for better security.")]
    PasswordNeedsLetter,
}

/// Meter shown while a new password is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    None,
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::None => "",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn has_email_shape(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

pub fn validate_registration(email: &str, password: &str, confirm: &str) -> Result<(), CredentialError> {
    if email.trim().is_empty() || password.is_empty() || confirm.is_empty() {
        return Err(CredentialError::MissingFields);
    }
    if !has_email_shape(email) {
        return Err(CredentialError::InvalidEmail);
    }
    if password.chars().count() < 6 {
        return Err(CredentialError::PasswordTooShort);
    }
    if password != confirm {
        return Err(CredentialError::PasswordMismatch);
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(CredentialError::PasswordNeedsLetter);
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), CredentialError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(CredentialError::MissingFields);
    }
    if !has_email_shape(email) {
        return Err(CredentialError::InvalidEmail);
    }
    Ok(())
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    match length {
        0 => PasswordStrength::None,
        1..=5 => PasswordStrength::Weak,
        6..=7 => PasswordStrength::Fair,
        _ => {
            let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
            let has_digit = password.chars().any(|c| c.is_ascii_digit());
            if has_letter && has_digit {
                PasswordStrength::Strong
            } else {
                PasswordStrength::Good
            }
        }
    }
}
