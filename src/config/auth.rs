//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration (JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    /// Password-reset token lifetime in seconds
    #[serde(default = "default_reset_ttl")]
    pub reset_ttl_secs: i64,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if self.jwt_secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.session_ttl_secs <= 0 || self.reset_ttl_secs <= 0 {
            return Err(ValidationError::InvalidTokenLifetime);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl_secs: default_session_ttl(),
            reset_ttl_secs: default_reset_ttl(),
        }
    }
}

fn default_session_ttl() -> i64 {
    7200 // 2 hours
}

fn default_reset_ttl() -> i64 {
    3600 // 1 hour
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "a".repeat(48),
            ..Default::default()
        }
    }

    #[test]
    fn test_auth_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl_secs, 7200);
        assert_eq!(config.reset_ttl_secs, 3600);
    }

    #[test]
    fn test_validation_missing_secret() {
        assert!(AuthConfig::default().validate().is_err());
    }

    #[test]
    fn test_validation_short_secret() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_non_positive_lifetimes() {
        let config = AuthConfig {
            session_ttl_secs: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }
}
