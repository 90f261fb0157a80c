//! Redis configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Redis configuration (idempotency guard / revoked tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// TTL for claimed payment event ids, in seconds. Providers stop
    /// retrying well within this window.
    #[serde(default = "default_event_ttl")]
    pub payment_event_ttl_secs: u64,

    /// TTL for revoked session tokens, in seconds. Must cover the maximum
    /// session lifetime.
    #[serde(default = "default_revoked_token_ttl")]
    pub revoked_token_ttl_secs: u64,
}

impl RedisConfig {
    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        Ok(())
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            payment_event_ttl_secs: default_event_ttl(),
            revoked_token_ttl_secs: default_revoked_token_ttl(),
        }
    }
}

fn default_event_ttl() -> u64 {
    3600
}

fn default_revoked_token_ttl() -> u64 {
    7200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_defaults() {
        let config = RedisConfig::default();
        assert_eq!(config.payment_event_ttl_secs, 3600);
        assert_eq!(config.revoked_token_ttl_secs, 7200);
    }

    #[test]
    fn test_validation_missing_url() {
        let config = RedisConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_url() {
        let config = RedisConfig {
            url: "http://localhost:6379".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_urls() {
        for url in ["redis://localhost:6379", "rediss://redis.example.com:6380"] {
            let config = RedisConfig {
                url: url.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }
}
