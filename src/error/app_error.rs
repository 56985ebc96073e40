use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Remote platform failures keep the upstream message intact so handlers can
/// report it verbatim to callers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// A managed platform API (document store, auth, messaging) rejected the call
    /// or could not be reached
    #[error("{message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Platform credentials could not be loaded or exchanged for an access token
    #[error("Credentials error: {message}")]
    Credentials { message: String },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Builds an upstream error for the named platform service.
    pub fn upstream(service: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        AppError::Credentials {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = match &error {
            crate::config::error::ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
