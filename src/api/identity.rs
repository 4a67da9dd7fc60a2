//! Identity provider capability: accounts, sign-in state and its change feed.

use super::subscription::Subscription;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Provider failures, each carrying the message shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("An account with this email already exists. Please use a different email or try logging in.")]
    EmailAlreadyInUse,
    #[error("Password is too weak. Please use at least 6 characters with a mix of letters and numbers.")]
    WeakPassword,
    #[error("No account found with this email address. Please check your email or create a new account.")]
    UserNotFound,
    #[error("Incorrect password. Please try again or reset your password.")]
    WrongPassword,
    #[error("You are not signed in.")]
    NotSignedIn,
    #[error("Identity provider unavailable: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for AuthError {
    fn from(err: rusqlite::Error) -> Self {
        AuthError::Backend(err.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Backend(err.to_string())
    }
}

/// Receives the signed-in user, or `None` after sign-out.
pub type AuthStateCallback = Box<dyn FnMut(&Option<User>) + Send>;

pub trait IdentityProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str) -> Result<User, AuthError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    fn sign_out(&self) -> Result<(), AuthError>;

    /// Requests a password reset for a known account.
    fn reset_password(&self, email: &str) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<User>;

    /// Calls `callback` with the current state now and after every change.
    fn on_auth_state_changed(&self, callback: AuthStateCallback) -> Subscription;
}
