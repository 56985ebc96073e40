//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    FileSettings, FirebaseConfig, LoggerSettings, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl FirebaseConfig {
    /// Validate Firebase configuration
    ///
    /// # Validation Rules
    /// - Project id, database id, collection names and admin id must be non-empty
    /// - Collection names and the admin id cannot contain `/`
    /// - API base URLs must be http(s) URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::validation(
                "firebase.project_id",
                "Firebase project id is required. Set firebase.project_id or BOOKING_FIREBASE__PROJECT_ID.",
            ));
        }

        if self.database_id.trim().is_empty() {
            return Err(ConfigError::validation(
                "firebase.database_id",
                "Database id cannot be empty. Use \"(default)\" for the default database.",
            ));
        }

        for (field, value) in [
            ("firebase.users_collection", &self.users_collection),
            ("firebase.bookings_collection", &self.bookings_collection),
            ("firebase.admin_user_id", &self.admin_user_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::validation(field, "Value cannot be empty."));
            }
            if value.contains('/') {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: format!("'{}' must be a single path segment without '/'.", value),
                });
            }
        }

        if let Some(path) = &self.credentials_file
            && path.trim().is_empty()
        {
            return Err(ConfigError::validation(
                "firebase.credentials_file",
                "Credentials file path cannot be empty when set.",
            ));
        }

        for (field, url) in [
            ("firebase.firestore_url", &self.firestore_url),
            ("firebase.auth_url", &self.auth_url),
            ("firebase.messaging_url", &self.messaging_url),
            ("firebase.metadata_token_url", &self.metadata_token_url),
        ] {
            if !is_http_url(url) {
                return Err(ConfigError::ValidationError {
                    field: field.to_string(),
                    message: format!("Invalid URL '{}'. Expected an http:// or https:// URL.", url),
                });
            }
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    match reqwest::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - At least one of console or file output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings, returning the first error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.firebase.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
