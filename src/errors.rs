use std::io;

use thiserror::Error;

/// Failures reported by a resource service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u16, body: Option<String> },
    /// The request never produced a response.
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ServiceError::Http { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

/// Errors raised while manipulating form values.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid value for `{field}`: {message}")]
    InvalidInput { field: String, message: String },
    #[error("Could not build resource from form: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised by the in-memory router.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Invalid route: {0}")]
    InvalidRoute(String),
}

/// Terminal failures surfaced by a form controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Failed to load resource: {0}")]
    Load(#[source] ServiceError),
    #[error("Failed to load reference data: {0}")]
    ReferenceData(#[source] ServiceError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
