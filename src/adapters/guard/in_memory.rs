//! In-memory idempotency guard for tests and single-node development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::IdempotencyGuard;

/// Map-backed guard with the same claim semantics as the Redis adapter.
///
/// Expired claims are dropped lazily on access; precise eviction timing is
/// not needed for correctness, only boundedness.
pub struct InMemoryIdempotencyGuard {
    claims: Mutex<HashMap<String, Instant>>,
    ttl: Duration,
}

impl InMemoryIdempotencyGuard {
    /// Creates a guard with the given claim TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            claims: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl IdempotencyGuard for InMemoryIdempotencyGuard {
    async fn claim(&self, key: &str) -> Result<bool, DomainError> {
        let mut claims = self.claims.lock().unwrap();
        let now = Instant::now();
        claims.retain(|_, claimed_at| now.duration_since(*claimed_at) < self.ttl);

        // Atomic under the mutex: insert-if-absent in one step.
        match claims.entry(key.to_string()) {
            std::collections::hash_map::Entry::Occupied(_) => Ok(false),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(now);
                Ok(true)
            }
        }
    }

    async fn is_claimed(&self, key: &str) -> Result<bool, DomainError> {
        let claims = self.claims.lock().unwrap();
        Ok(claims
            .get(key)
            .map(|claimed_at| claimed_at.elapsed() < self.ttl)
            .unwrap_or(false))
    }

    async fn release(&self, key: &str) -> Result<(), DomainError> {
        self.claims.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn guard() -> InMemoryIdempotencyGuard {
        InMemoryIdempotencyGuard::new(Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn first_claim_wins_second_loses() {
        let guard = guard();

        assert!(guard.claim("evt_1").await.unwrap());
        assert!(!guard.claim("evt_1").await.unwrap());
        assert!(guard.is_claimed("evt_1").await.unwrap());
    }

    #[tokio::test]
    async fn different_keys_claim_independently() {
        let guard = guard();

        assert!(guard.claim("evt_1").await.unwrap());
        assert!(guard.claim("evt_2").await.unwrap());
    }

    #[tokio::test]
    async fn release_allows_a_new_claim() {
        let guard = guard();

        assert!(guard.claim("evt_1").await.unwrap());
        guard.release("evt_1").await.unwrap();
        assert!(guard.claim("evt_1").await.unwrap());
    }

    #[tokio::test]
    async fn expired_claims_are_forgotten() {
        let guard = InMemoryIdempotencyGuard::new(Duration::from_millis(10));

        assert!(guard.claim("evt_1").await.unwrap());
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!guard.is_claimed("evt_1").await.unwrap());
        assert!(guard.claim("evt_1").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_claims_yield_exactly_one_winner() {
        let guard = Arc::new(guard());

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let guard = guard.clone();
                tokio::spawn(async move { guard.claim("evt_contended").await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }

        assert_eq!(winners, 1);
    }
}
