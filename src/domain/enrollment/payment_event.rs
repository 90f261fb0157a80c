//! Normalized payment events delivered via webhook.
//!
//! Events are transient: nothing here is persisted beyond the idempotency
//! bookkeeping keyed by the provider event id.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, UserId};

/// Kinds of payment events the unlock workflow understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentEventKind {
    /// Payment confirmed; unlock the course.
    PaymentSucceeded,

    /// Payment failed or was rejected; log, never mutate entitlements.
    PaymentFailed,

    /// Anything else; acknowledged without action so new provider event
    /// types cannot break the webhook endpoint.
    Unknown(String),
}

/// Correlation metadata the checkout embedded for the webhook round-trip.
///
/// The provider echoes metadata values back as strings regardless of the
/// original type, so both ids arrive as strings and are parsed on receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMetadata {
    pub user_id: Option<String>,
    pub course_id: Option<String>,
}

impl PaymentMetadata {
    /// Resolves the metadata into typed ids, if both are present and
    /// numeric.
    pub fn resolve_ids(&self) -> Option<(UserId, CourseId)> {
        let user_id = UserId::from_str(self.user_id.as_deref()?).ok()?;
        let course_id = CourseId::from_str(self.course_id.as_deref()?).ok()?;
        Some((user_id, course_id))
    }
}

/// A verified webhook event, normalized across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// Provider event id; the idempotency key for deduplication.
    pub id: String,

    pub kind: PaymentEventKind,

    pub metadata: PaymentMetadata,

    /// Provider-reported reason on failed payments.
    pub failure_reason: Option<String>,

    /// Provider-side creation time (Unix seconds).
    pub created_at: i64,
}
