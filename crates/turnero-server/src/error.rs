//! Server error types.
//!
//! Any of these returned during startup is fatal: the binary logs it and
//! exits with a failure status. Per-request failures never surface here;
//! they are [`BookingFailure`](crate::booking::BookingFailure)s.

use std::io;
use thiserror::Error;

use turnero_core::TracingError;
use turnero_providers::ProviderError;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (listener bind, serving).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Credentials, authorization or calendar client setup failed.
    #[error("Google error: {0}")]
    Provider(#[from] ProviderError),

    /// Page template could not be loaded or compiled.
    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// Logging could not be initialized.
    #[error("Tracing error: {0}")]
    Tracing(#[from] TracingError),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
