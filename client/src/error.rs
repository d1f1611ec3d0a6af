//! Client error handling
//!
//! One error type for every network collaborator, so callers can surface
//! failures as-is.

use cookcraft_shared::errors::{AuthError, ValidationError};
use reqwest::StatusCode;
use thiserror::Error;

/// Error returned by the CookCraft clients
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ClientError {
    /// Status code for API failures
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

/// Result type alias for client calls
pub type ClientResult<T> = Result<T, ClientError>;
