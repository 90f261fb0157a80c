//! IdempotencyGuard port - at-most-once processing of external events.
//!
//! Payment providers retry webhook deliveries on any non-2xx response or
//! timeout, so the same event id can arrive more than once. The guard
//! records claims with a TTL (provider event ids are not reused after the
//! retry window), which keeps the key space bounded.
//!
//! The same mechanism backs the revoked-session-token set used on logout;
//! the two concerns run as separate guard instances with distinct key
//! namespaces.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for atomic claim-once bookkeeping with expiry.
#[async_trait]
pub trait IdempotencyGuard: Send + Sync {
    /// Atomically record that `key` is being processed.
    ///
    /// Returns `true` if this call made the first claim, `false` if the key
    /// was already claimed. Implementations MUST make this a single atomic
    /// check-and-set, not a read followed by a write, so two concurrent
    /// deliveries of the same event cannot both observe "not claimed".
    async fn claim(&self, key: &str) -> Result<bool, DomainError>;

    /// True iff the key is currently claimed.
    async fn is_claimed(&self, key: &str) -> Result<bool, DomainError>;

    /// Drop a claim so a later delivery can retry the work.
    ///
    /// Used when processing fails after the claim was taken; releasing is
    /// best-effort and releasing an unclaimed key is not an error.
    async fn release(&self, key: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotency_guard_is_object_safe() {
        fn _accepts_dyn(_guard: &dyn IdempotencyGuard) {}
    }
}
