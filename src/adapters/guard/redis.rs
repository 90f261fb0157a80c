//! Redis-backed idempotency guard for production deployments.
//!
//! Claims are single `SET key value NX EX ttl` commands, which makes the
//! check-and-set atomic on the Redis side. Keys expire after the namespace
//! TTL so the claim space stays bounded.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::IdempotencyGuard;

/// Redis-backed guard for a single key namespace.
///
/// Separate concerns (payment events, revoked tokens) run as separate
/// instances with their own prefix and TTL.
#[derive(Clone)]
pub struct RedisIdempotencyGuard {
    conn: MultiplexedConnection,
    /// Key prefix, e.g. `"payment_event"` or `"revoked_token"`.
    namespace: String,
    /// Claim lifetime in seconds.
    ttl_secs: u64,
}

impl RedisIdempotencyGuard {
    /// Creates a guard over the given namespace with the given claim TTL.
    pub fn new(conn: MultiplexedConnection, namespace: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
            ttl_secs,
        }
    }

    fn redis_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    fn unavailable(e: redis::RedisError) -> DomainError {
        DomainError::new(ErrorCode::CacheError, format!("Redis unavailable: {}", e))
    }
}

#[async_trait]
impl IdempotencyGuard for RedisIdempotencyGuard {
    async fn claim(&self, key: &str) -> Result<bool, DomainError> {
        let redis_key = self.redis_key(key);
        let mut conn = self.conn.clone();

        // SET NX EX in one round-trip; the reply is OK on first claim and
        // nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(&redis_key)
            .arg(1_i64)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await
            .map_err(Self::unavailable)?;

        Ok(reply.is_some())
    }

    async fn is_claimed(&self, key: &str) -> Result<bool, DomainError> {
        let redis_key = self.redis_key(key);
        let mut conn = self.conn.clone();

        let exists: bool = conn.exists(&redis_key).await.map_err(Self::unavailable)?;

        Ok(exists)
    }

    async fn release(&self, key: &str) -> Result<(), DomainError> {
        let redis_key = self.redis_key(key);
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(&redis_key)
            .await
            .map_err(Self::unavailable)?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisIdempotencyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisIdempotencyGuard")
            .field("namespace", &self.namespace)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    // Redis integration tests require a running Redis instance and are run
    // separately from unit tests.
    //
    // Example test setup:
    //
    // #[tokio::test]
    // #[ignore] // Run with: cargo test -- --ignored
    // async fn claim_is_first_writer_wins() {
    //     let client = redis::Client::open("redis://127.0.0.1/").unwrap();
    //     let conn = client.get_multiplexed_tokio_connection().await.unwrap();
    //     let guard = RedisIdempotencyGuard::new(conn, "test_events", 60);
    //     assert!(guard.claim("evt_1").await.unwrap());
    //     assert!(!guard.claim("evt_1").await.unwrap());
    // }
}
