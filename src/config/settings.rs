//! Configuration settings structures for booking-relay
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "booking-relay".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_id() -> String {
    "(default)".to_string()
}

fn default_users_collection() -> String {
    "users".to_string()
}

fn default_bookings_collection() -> String {
    "bookings".to_string()
}

fn default_admin_user_id() -> String {
    "admin".to_string()
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_auth_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_messaging_url() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_metadata_token_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/booking-relay.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Firebase Configuration
// ============================================================================

/// Firebase project, collection layout and API endpoints.
///
/// The `*_url` fields are API base URLs. They only need to change when
/// pointing at the local emulator suite or a test double.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Google Cloud project id that owns the Firestore database
    #[serde(default)]
    pub project_id: String,

    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// Collection holding user profile records (delivery tokens)
    #[serde(default = "default_users_collection")]
    pub users_collection: String,

    /// Collection whose create/update events trigger notifications
    #[serde(default = "default_bookings_collection")]
    pub bookings_collection: String,

    /// Profile id of the administrator notified about new bookings
    #[serde(default = "default_admin_user_id")]
    pub admin_user_id: String,

    /// Service-account key file. When unset, tokens come from the metadata server.
    #[serde(default)]
    pub credentials_file: Option<String>,

    /// Talk to the emulator suite with its static `owner` token
    #[serde(default)]
    pub emulator: bool,

    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_messaging_url")]
    pub messaging_url: String,

    #[serde(default = "default_metadata_token_url")]
    pub metadata_token_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database_id: default_database_id(),
            users_collection: default_users_collection(),
            bookings_collection: default_bookings_collection(),
            admin_user_id: default_admin_user_id(),
            credentials_file: None,
            emulator: false,
            firestore_url: default_firestore_url(),
            auth_url: default_auth_url(),
            messaging_url: default_messaging_url(),
            metadata_token_url: default_metadata_token_url(),
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    /// Append to an existing file instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

impl FileSettings {
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format", e.to_string()))?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format)
            .map_err(|e| ConfigError::validation("logger.file", e.to_string()))
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub firebase: FirebaseConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
