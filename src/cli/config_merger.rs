//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI overrides on top of file and environment configuration.
///
/// Precedence, highest first: CLI flags, `BOOKING_*` environment variables,
/// configuration files.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the CLI points at.
    ///
    /// `--config` selects a single file; otherwise the layered directory is
    /// used. `--env` overrides `BOOKING_APP_ENV`. Validation is deferred to
    /// [`merge_cli_args`](Self::merge_cli_args) so that CLI flags can fix
    /// values the files get wrong.
    ///
    /// # Errors
    /// Returns ConfigError if the configuration cannot be found or parsed
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match &cli.config {
            Some(path) => ConfigLoader::from_file(path.clone()),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Merge CLI arguments with the base configuration and validate the result
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);

        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;

        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                dry_run: _,
            } => {
                if let Some(host_addr) = host {
                    config.server.host = host_addr.clone();
                }

                if let Some(port_num) = port {
                    config.server.port = *port_num;
                }

                // Command-specific level wins over --verbose/--quiet
                if let Some(level) = log_level {
                    config.logger.level = (*level).into();
                }
            }
        }
    }

    /// Get the base configuration (useful for inspection)
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
