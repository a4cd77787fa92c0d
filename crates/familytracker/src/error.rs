//! Error types for familytracker.
//!
//! Roster operations never fail; the errors here come from the edges of the
//! system: loading configuration, rejected form submissions and malformed
//! session commands.

use std::path::PathBuf;
use thiserror::Error;

use crate::form::FormError;
use crate::map::FormKind;

/// The main error type for familytracker operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Session Errors ===
    /// A form submission was rejected.
    #[error("form rejected: {0}")]
    Form(#[from] FormError),

    /// A submission targeted a form that is currently hidden.
    #[error("the {0} form is hidden")]
    FormHidden(FormKind),

    /// A session command could not be parsed.
    #[error("invalid command: {message}")]
    InvalidCommand {
        /// Description of what went wrong.
        message: String,
    },

    /// A script file could not be read.
    #[error("failed to read script {path}: {source}")]
    ScriptRead {
        /// Path to the script file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// Terminal or file system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for familytracker operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid command error.
    #[must_use]
    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self::InvalidCommand {
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error is a rejected form submission.
    #[must_use]
    pub fn is_form_rejection(&self) -> bool {
        matches!(self, Self::Form(_))
    }
}
