//! Entitlement records: the durable (user, course) purchase mapping.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, Timestamp, UserId, ValidationError};

/// Lifecycle of a purchase for one (user, course) pair.
///
/// At most one row exists per pair; the status moves
/// `pending -> approved | failed`, and an approved row never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// Checkout started, webhook confirmation not yet received.
    Pending,

    /// Payment confirmed; the user may access the course.
    Approved,

    /// Payment failed or was rejected by the provider.
    Failed,
}

impl PurchaseStatus {
    /// Parses the storage representation.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PurchaseStatus::Pending),
            "approved" => Ok(PurchaseStatus::Approved),
            "failed" => Ok(PurchaseStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("'{}' is not a purchase status", other),
            )),
        }
    }

    /// Returns the canonical storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Approved => "approved",
            PurchaseStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A durable grant (or grant attempt) of a user's access to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub status: PurchaseStatus,
    /// Provider-side reference (checkout session or payment event id).
    pub external_reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entitlement {
    /// True iff this entitlement actually grants course access.
    pub fn is_approved(&self) -> bool {
        self.status == PurchaseStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_storage_form() {
        for status in [
            PurchaseStatus::Pending,
            PurchaseStatus::Approved,
            PurchaseStatus::Failed,
        ] {
            assert_eq!(PurchaseStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(
            PurchaseStatus::parse("APPROVED").unwrap(),
            PurchaseStatus::Approved
        );
    }

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert!(PurchaseStatus::parse("refunded").is_err());
        assert!(PurchaseStatus::parse("").is_err());
    }

    #[test]
    fn only_approved_grants_access() {
        let mut entitlement = Entitlement {
            user_id: UserId::new(7),
            course_id: CourseId::new(1),
            status: PurchaseStatus::Pending,
            external_reference: Some("cs_test_123".to_string()),
            created_at: Timestamp::from_unix_secs(1_700_000_000),
            updated_at: Timestamp::from_unix_secs(1_700_000_000),
        };
        assert!(!entitlement.is_approved());

        entitlement.status = PurchaseStatus::Approved;
        assert!(entitlement.is_approved());

        entitlement.status = PurchaseStatus::Failed;
        assert!(!entitlement.is_approved());
    }
}
