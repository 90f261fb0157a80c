//! EntitlementStore port - the single source of truth for course access.
//!
//! The store is the only writer of the (user, course) purchase relation.
//! Both the webhook-driven unlock and administrative grants go through it,
//! so the "at most one approved record per pair" invariant lives in exactly
//! one place: a unique constraint on the pair, with `grant` implemented as
//! an upsert.

use async_trait::async_trait;

use crate::domain::enrollment::Entitlement;
use crate::domain::foundation::{CourseId, DomainError, UserId};

/// Port for the durable (user, course) -> purchase status mapping.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Grant course access, idempotently.
    ///
    /// Creates an `approved` record, or promotes an existing `pending` /
    /// `failed` record. Granting an already-approved pair is a no-op that
    /// returns the stored entitlement. Concurrent grants for the same pair
    /// converge on one row; a duplicate-key outcome is "already granted",
    /// never an error.
    ///
    /// Fails with `UserNotFound` / `CourseNotFound` when an id does not
    /// resolve to an existing record.
    async fn grant(
        &self,
        user_id: UserId,
        course_id: CourseId,
        external_reference: Option<&str>,
    ) -> Result<Entitlement, DomainError>;

    /// Remove the association for the pair.
    ///
    /// Fails with `EntitlementNotFound` if the pair is not associated.
    async fn revoke(&self, user_id: UserId, course_id: CourseId) -> Result<(), DomainError>;

    /// True iff an `approved` record exists for the pair.
    async fn has(&self, user_id: UserId, course_id: CourseId) -> Result<bool, DomainError>;

    /// Load the record for the pair, whatever its status.
    async fn find(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Entitlement>, DomainError>;

    /// Record that a checkout was started for the pair.
    ///
    /// Never downgrades an `approved` record.
    async fn mark_pending(
        &self,
        user_id: UserId,
        course_id: CourseId,
        external_reference: &str,
    ) -> Result<Entitlement, DomainError>;

    /// Record a failed payment for the pair, if a non-approved record
    /// exists. Returns the updated record, or `None` when there was nothing
    /// to mark.
    async fn mark_failed(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Option<Entitlement>, DomainError>;

    /// All purchase records for a user.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Entitlement>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlement_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn EntitlementStore) {}
    }
}
