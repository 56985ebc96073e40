//! Configuration loader for booking-relay
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "BOOKING_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "BOOKING_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "BOOKING";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `{environment}.toml` - Environment-specific configuration (optional)
/// 3. `local.toml` - Local development overrides (optional)
/// 4. `BOOKING_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`BOOKING_CONFIG_DIR`)
    /// - Specific configuration file (`BOOKING_CONFIG_FILE`)
    /// - Application environment (`BOOKING_APP_ENV`)
    ///
    /// # Errors
    ///
    /// Returns an error if both `BOOKING_CONFIG_DIR` and `BOOKING_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "BOOKING_CONFIG_DIR and BOOKING_CONFIG_FILE cannot both be set. \
                 Use BOOKING_CONFIG_DIR for layered configuration or \
                 BOOKING_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Load a single configuration file, ignoring the layered directory.
    ///
    /// Environment variable overrides still apply on top of the file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Override the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` (or the single configured file) is not found
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration without validating it.
    ///
    /// Used when further overrides (CLI flags) are applied before validation.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match &self.config_file {
            Some(config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // BOOKING_SERVER__PORT -> server.port
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(&self, builder: Builder) -> Result<Builder, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, true)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: Builder,
        path: &Path,
        required: bool,
    ) -> Result<Builder, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    /// `BOOKING_FIREBASE__PROJECT_ID` -> `firebase.project_id`
    fn add_env_source(builder: Builder) -> Builder {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ENV_LOCK, EnvGuard};
    use std::fs;
    use tempfile::TempDir;

    const DEFAULT_TOML: &str = r#"
[application]
name = "relay-test"
version = "1.0.0"

[server]
host = "127.0.0.1"
port = 3000

[firebase]
project_id = "salon-default"
admin_user_id = "admin"

[logger]
level = "info"

[logger.console]
enabled = true
colored = false
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    fn clear_loader_env(env: &mut EnvGuard) {
        env.remove("BOOKING_CONFIG_DIR");
        env.remove("BOOKING_CONFIG_FILE");
        env.remove("BOOKING_APP_ENV");
        env.remove("BOOKING_SERVER__PORT");
        env.remove("BOOKING_FIREBASE__PROJECT_ID");
    }

    #[test]
    fn test_config_loader_new_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);
        env.set("BOOKING_CONFIG_DIR", "/custom/config");
        env.set("BOOKING_CONFIG_FILE", "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("BOOKING_CONFIG_DIR"));
                assert!(msg.contains("BOOKING_CONFIG_FILE"));
            }
            other => panic!("Expected MutualExclusivityError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[]);
        env.set("BOOKING_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let loader = ConfigLoader::new().expect("Should create loader");
        match loader.load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_default_toml_only() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_TOML)]);
        env.set("BOOKING_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        // staging.toml and local.toml do not exist and are optional
        env.set("BOOKING_APP_ENV", "staging");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");
        assert_eq!(settings.application.name, "relay-test");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.firebase.project_id, "salon-default");
        assert_eq!(settings.firebase.bookings_collection, "bookings");
    }

    #[test]
    fn test_load_full_precedence_chain() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let production = r#"
[server]
host = "0.0.0.0"
port = 8080

[firebase]
project_id = "salon-prod"
"#;
        let local = r#"
[server]
port = 9090
"#;

        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("production.toml", production),
            ("local.toml", local),
        ]);
        env.set("BOOKING_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("BOOKING_APP_ENV", "production");
        env.set("BOOKING_FIREBASE__PROJECT_ID", "salon-from-env");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        // environment variables win over every file
        assert_eq!(settings.firebase.project_id, "salon-from-env");
        // local.toml overrides production.toml
        assert_eq!(settings.server.port, 9090);
        // production.toml overrides default.toml
        assert_eq!(settings.server.host, "0.0.0.0");
        // default.toml provides the rest
        assert_eq!(settings.firebase.admin_user_id, "admin");
        assert_eq!(settings.application.name, "relay-test");
    }

    #[test]
    fn test_with_environment_overrides_env_var() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let test_toml = r#"
[server]
port = 4100
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("test.toml", test_toml),
        ]);
        env.set("BOOKING_CONFIG_DIR", temp_dir.path().to_str().unwrap());
        env.set("BOOKING_APP_ENV", "production");

        let settings = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Test)
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 4100);
    }

    #[test]
    fn test_load_single_file_mode() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let single = r#"
[server]
port = 5000

[firebase]
project_id = "single-file"
emulator = true
"#;
        let temp_dir = setup_config_dir(&[("single.toml", single)]);
        env.set(
            "BOOKING_CONFIG_FILE",
            temp_dir.path().join("single.toml").to_str().unwrap(),
        );

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.firebase.project_id, "single-file");
        assert!(settings.firebase.emulator);
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let _lock = ENV_LOCK.lock().unwrap();
        let mut env = EnvGuard::new();
        clear_loader_env(&mut env);

        let temp_dir = setup_config_dir(&[("default.toml", "[server]\nport = 3000\n")]);
        env.set("BOOKING_CONFIG_DIR", temp_dir.path().to_str().unwrap());

        let loader = ConfigLoader::new().unwrap();
        assert!(loader.load_unvalidated().is_ok());
        assert!(matches!(
            loader.load(),
            Err(ConfigError::ValidationError { field, .. }) if field == "firebase.project_id"
        ));
    }
}
