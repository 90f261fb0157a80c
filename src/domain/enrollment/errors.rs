//! Enrollment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | CourseNotFound / UserNotFound / NotEnrolled | 404 |
//! | AlreadyPurchased | 409 |
//! | InvalidWebhookSignature | 400 |
//! | PaymentFailed | 402 |
//! | GatewayUnavailable | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, UserId};

/// Enrollment and purchase-unlock errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// Course id did not resolve.
    CourseNotFound(CourseId),

    /// User id did not resolve.
    UserNotFound(UserId),

    /// The pair has no current association to revoke.
    NotEnrolled { user_id: UserId, course_id: CourseId },

    /// An approved entitlement already exists for the pair.
    AlreadyPurchased { user_id: UserId, course_id: CourseId },

    /// Webhook signature verification failed.
    InvalidWebhookSignature,

    /// The payment provider rejected or failed the payment.
    PaymentFailed { reason: String },

    /// The payment provider could not be reached; the caller may retry.
    GatewayUnavailable { reason: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl EnrollmentError {
    pub fn course_not_found(id: CourseId) -> Self {
        EnrollmentError::CourseNotFound(id)
    }

    pub fn user_not_found(id: UserId) -> Self {
        EnrollmentError::UserNotFound(id)
    }

    pub fn not_enrolled(user_id: UserId, course_id: CourseId) -> Self {
        EnrollmentError::NotEnrolled { user_id, course_id }
    }

    pub fn already_purchased(user_id: UserId, course_id: CourseId) -> Self {
        EnrollmentError::AlreadyPurchased { user_id, course_id }
    }

    pub fn invalid_webhook_signature() -> Self {
        EnrollmentError::InvalidWebhookSignature
    }

    pub fn payment_failed(reason: impl Into<String>) -> Self {
        EnrollmentError::PaymentFailed {
            reason: reason.into(),
        }
    }

    pub fn gateway_unavailable(reason: impl Into<String>) -> Self {
        EnrollmentError::GatewayUnavailable {
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EnrollmentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EnrollmentError::CourseNotFound(_) => ErrorCode::CourseNotFound,
            EnrollmentError::UserNotFound(_) => ErrorCode::UserNotFound,
            EnrollmentError::NotEnrolled { .. } => ErrorCode::EntitlementNotFound,
            EnrollmentError::AlreadyPurchased { .. } => ErrorCode::AlreadyPurchased,
            EnrollmentError::InvalidWebhookSignature => ErrorCode::InvalidWebhookSignature,
            EnrollmentError::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            EnrollmentError::GatewayUnavailable { .. } => ErrorCode::ExternalServiceError,
            EnrollmentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            EnrollmentError::CourseNotFound(id) => format!("Course not found: {}", id),
            EnrollmentError::UserNotFound(id) => format!("User not found: {}", id),
            EnrollmentError::NotEnrolled { user_id, course_id } => format!(
                "User {} is not enrolled in course {}",
                user_id, course_id
            ),
            EnrollmentError::AlreadyPurchased { course_id, .. } => {
                format!("Course {} has already been purchased", course_id)
            }
            EnrollmentError::InvalidWebhookSignature => {
                "Invalid webhook signature".to_string()
            }
            EnrollmentError::PaymentFailed { reason } => format!("Payment failed: {}", reason),
            EnrollmentError::GatewayUnavailable { reason } => {
                format!("Payment provider unavailable: {}", reason)
            }
            EnrollmentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the caller may safely retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EnrollmentError::GatewayUnavailable { .. } | EnrollmentError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EnrollmentError {}

impl From<DomainError> for EnrollmentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::CourseNotFound | ErrorCode::UserNotFound | ErrorCode::EntitlementNotFound => {
                EnrollmentError::Infrastructure(err.to_string())
            }
            ErrorCode::ExternalServiceError => EnrollmentError::GatewayUnavailable {
                reason: err.message,
            },
            _ => EnrollmentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<EnrollmentError> for DomainError {
    fn from(err: EnrollmentError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_purchased_maps_to_conflict_code() {
        let err = EnrollmentError::already_purchased(UserId::new(7), CourseId::new(1));
        assert_eq!(err.code(), ErrorCode::AlreadyPurchased);
        assert!(err.message().contains('1'));
    }

    #[test]
    fn invalid_signature_has_dedicated_code() {
        let err = EnrollmentError::invalid_webhook_signature();
        assert_eq!(err.code(), ErrorCode::InvalidWebhookSignature);
    }

    #[test]
    fn gateway_and_infrastructure_errors_are_retryable() {
        assert!(EnrollmentError::gateway_unavailable("timeout").is_retryable());
        assert!(EnrollmentError::infrastructure("pool exhausted").is_retryable());
        assert!(!EnrollmentError::invalid_webhook_signature().is_retryable());
        assert!(!EnrollmentError::already_purchased(UserId::new(1), CourseId::new(1)).is_retryable());
    }

    #[test]
    fn converts_to_domain_error() {
        let err = EnrollmentError::course_not_found(CourseId::new(3));
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, err.code());
    }
}
