//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Generic text shown when the scoring service cannot be reached.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error connecting to API. Please try again later.";

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("catalog unavailable: {path}: {message}")]
    CatalogUnavailable { path: PathBuf, message: String },

    #[error("scoring service request failed: {message}")]
    Transport { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// The text an end user sees for this error.
    ///
    /// Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::Transport { .. } => TRANSPORT_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
