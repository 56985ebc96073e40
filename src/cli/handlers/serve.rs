//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::external::google::ServiceAccountKey;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command
    ///
    /// # Arguments
    /// * `dry_run` - If true, validates configuration and exits without starting server
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Unreadable service-account key
    /// - Server startup errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config).run().await?;
        Ok(())
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        let credentials = self.check_credentials()?;

        let firebase = &self.config.firebase;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Firebase project: {} (database {})",
            firebase.project_id, firebase.database_id
        );
        println!(
            "✓ Bookings collection: {}, users collection: {}, admin profile: {}",
            firebase.bookings_collection, firebase.users_collection, firebase.admin_user_id
        );
        println!("✓ Credentials: {}", credentials);
        println!("✓ Logger level: {}", self.config.logger.level);

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Describes where access tokens will come from, reading the key file
    /// when one is configured.
    fn check_credentials(&self) -> AppResult<String> {
        let firebase = &self.config.firebase;

        if firebase.emulator {
            return Ok("emulator (static owner token)".to_string());
        }

        match &firebase.credentials_file {
            Some(path) => {
                let key = ServiceAccountKey::from_file(path)?;
                Ok(format!("service account {}", key.client_email))
            }
            None => Ok(format!("metadata server ({})", firebase.metadata_token_url)),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.firebase.project_id = "salon-test".to_string();
        config
    }

    #[test]
    fn test_serve_handler_new() {
        let config = create_valid_config();
        let handler = ServeCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let handler = ServeCommandHandler::new(create_valid_config());
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_invalid_config() {
        let mut config = create_valid_config();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config);

        assert!(handler.execute(true).await.is_err());
    }

    #[test]
    fn test_dry_run_reads_service_account_key() {
        let mut config = create_valid_config();
        config.firebase.credentials_file = Some(format!(
            "{}/tests/fixtures/service_account.json",
            env!("CARGO_MANIFEST_DIR")
        ));
        let handler = ServeCommandHandler::new(config);

        let description = handler.check_credentials().unwrap();
        assert!(description.starts_with("service account "));
    }

    #[test]
    fn test_dry_run_rejects_missing_key_file() {
        let mut config = create_valid_config();
        config.firebase.credentials_file = Some("/nonexistent/key.json".to_string());
        let handler = ServeCommandHandler::new(config);

        assert!(handler.validate_only().is_err());
    }

    #[test]
    fn test_emulator_credentials_description() {
        let mut config = create_valid_config();
        config.firebase.emulator = true;
        let handler = ServeCommandHandler::new(config);

        assert!(handler.check_credentials().unwrap().starts_with("emulator"));
    }
}
