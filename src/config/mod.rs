//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the `CETMA`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use cetma_backend::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod email;
mod error;
mod payment;
mod redis;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis configuration (idempotency guard / revoked tokens)
    pub redis: RedisConfig,

    /// Authentication configuration (JWT)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `CETMA__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CETMA__DATABASE__URL=...` -> `database.url = ...`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CETMA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.auth.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("CETMA__DATABASE__URL", "postgresql://test@localhost/cetma");
        env::set_var("CETMA__REDIS__URL", "redis://localhost:6379");
        env::set_var(
            "CETMA__AUTH__JWT_SECRET",
            "a-jwt-secret-that-is-long-enough-for-hmac",
        );
        env::set_var("CETMA__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("CETMA__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
        env::set_var("CETMA__PAYMENT__CLIENT_URL", "https://app.example.com");
        env::set_var("CETMA__EMAIL__RESEND_API_KEY", "re_xxx");
        env::set_var(
            "CETMA__EMAIL__RESET_URL",
            "https://app.example.com/reset-password",
        );
    }

    fn clear_env() {
        for key in [
            "CETMA__DATABASE__URL",
            "CETMA__REDIS__URL",
            "CETMA__AUTH__JWT_SECRET",
            "CETMA__PAYMENT__STRIPE_API_KEY",
            "CETMA__PAYMENT__STRIPE_WEBHOOK_SECRET",
            "CETMA__PAYMENT__CLIENT_URL",
            "CETMA__EMAIL__RESEND_API_KEY",
            "CETMA__EMAIL__RESET_URL",
            "CETMA__SERVER__PORT",
            "CETMA__SERVER__ENVIRONMENT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/cetma");
        assert_eq!(config.redis.url, "redis://localhost:6379");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CETMA__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }
}
