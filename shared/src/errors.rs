//! Error types shared by the CookCraft crates

use thiserror::Error;

/// Input validation failure tied to a form field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Authentication error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Your email or password is incorrect.")]
    InvalidCredentials,

    #[error("This email is already in use. Try logging in or use a different address.")]
    EmailAlreadyInUse,

    #[error("Network error. Please check your connection.")]
    Network,

    #[error("Your password is too weak. Please choose a stronger password.")]
    WeakPassword,

    #[error("No account found with this email.")]
    UserNotFound,

    #[error("Too many failed attempts. Try again later.")]
    AccountLocked,

    #[error("Invalid email format. Please check again.")]
    InvalidEmailFormat,

    #[error("Failed to sign up. Please try again.")]
    SignUpFailed,

    #[error("{0}")]
    Unknown(String),
}

impl AuthError {
    /// Map an auth server message onto a user-facing error
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if has(&["invalid login", "invalid credentials"]) {
            AuthError::InvalidCredentials
        } else if has(&["already registered", "email already in use"]) {
            AuthError::EmailAlreadyInUse
        } else if has(&["network", "internet", "connection"]) {
            AuthError::Network
        } else if has(&["weak password", "too short", "must contain"]) {
            AuthError::WeakPassword
        } else if has(&["user not found", "no user", "account does not exist"]) {
            AuthError::UserNotFound
        } else if has(&["locked", "too many attempts"]) {
            AuthError::AccountLocked
        } else if has(&["invalid email", "email format", "not valid"]) {
            AuthError::InvalidEmailFormat
        } else {
            AuthError::Unknown(message.to_string())
        }
    }
}
