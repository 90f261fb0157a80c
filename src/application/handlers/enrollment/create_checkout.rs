//! CreateCheckoutHandler - Command handler for starting a course purchase.

use std::sync::Arc;

use crate::domain::enrollment::EnrollmentError;
use crate::domain::foundation::{CourseId, UserId};
use crate::ports::{
    CourseRepository, CreateCheckoutRequest, EntitlementStore, PaymentGateway, UserRepository,
};

/// Redirect targets handed to the payment provider.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL for the success redirect; course and user ids are appended
    /// as query parameters so the client can resume after payment.
    pub success_url: String,

    /// URL for the cancel redirect.
    pub cancel_url: String,
}

impl CheckoutUrls {
    /// Builds both redirect targets from the client application base URL.
    pub fn from_client_url(client_url: &str) -> Self {
        let base = client_url.trim_end_matches('/');
        Self {
            success_url: format!("{}/success", base),
            cancel_url: format!("{}/cancel", base),
        }
    }
}

/// Command to start a checkout for one course.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Result of starting a checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutResult {
    /// Provider-hosted URL the client redirects the payer to.
    pub redirect_url: String,

    /// Provider session id, recorded as the pending purchase reference.
    pub session_id: String,
}

/// Handler for starting a course purchase.
///
/// Validates the pair before any provider call: both ids must resolve and
/// the course must not already be approved for the user. A pending purchase
/// record is written after the session is created so the webhook can later
/// promote it.
pub struct CreateCheckoutHandler {
    user_repository: Arc<dyn UserRepository>,
    course_repository: Arc<dyn CourseRepository>,
    entitlement_store: Arc<dyn EntitlementStore>,
    payment_gateway: Arc<dyn PaymentGateway>,
    urls: CheckoutUrls,
}

impl CreateCheckoutHandler {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        course_repository: Arc<dyn CourseRepository>,
        entitlement_store: Arc<dyn EntitlementStore>,
        payment_gateway: Arc<dyn PaymentGateway>,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            user_repository,
            course_repository,
            entitlement_store,
            payment_gateway,
            urls,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CreateCheckoutResult, EnrollmentError> {
        // 1. Both ids must resolve before the provider is involved.
        let user = self
            .user_repository
            .find_by_id(cmd.user_id)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))?
            .ok_or_else(|| EnrollmentError::user_not_found(cmd.user_id))?;

        let course = self
            .course_repository
            .find_by_id(cmd.course_id)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))?
            .ok_or_else(|| EnrollmentError::course_not_found(cmd.course_id))?;

        // 2. An approved entitlement makes a second purchase a conflict.
        if self
            .entitlement_store
            .has(cmd.user_id, cmd.course_id)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))?
        {
            return Err(EnrollmentError::already_purchased(
                cmd.user_id,
                cmd.course_id,
            ));
        }

        // 3. Create the provider session with correlation metadata.
        let request = CreateCheckoutRequest {
            user_id: user.id,
            course_id: course.id,
            course_title: course.title.clone(),
            course_description: course.description.clone(),
            price: course.price,
            success_url: format!(
                "{}?courseId={}&userId={}",
                self.urls.success_url, course.id, user.id
            ),
            cancel_url: self.urls.cancel_url.clone(),
        };

        let session = self
            .payment_gateway
            .create_checkout(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %cmd.user_id,
                    course_id = %cmd.course_id,
                    error = %e,
                    "Checkout session creation failed"
                );
                EnrollmentError::gateway_unavailable(e.to_string())
            })?;

        // 4. Record the pending purchase. Bookkeeping only: the session
        //    already exists, so a write failure must not fail the checkout.
        if let Err(e) = self
            .entitlement_store
            .mark_pending(cmd.user_id, cmd.course_id, &session.id)
            .await
        {
            tracing::warn!(
                user_id = %cmd.user_id,
                course_id = %cmd.course_id,
                session_id = %session.id,
                error = %e,
                "Failed to record pending purchase"
            );
        }

        Ok(CreateCheckoutResult {
            redirect_url: session.url,
            session_id: session.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::enrollment::test_support::{
        InMemoryEntitlementStore, MockCourseRepository, MockGateway, MockUserRepository,
    };
    use crate::domain::course::Price;

    fn handler_with(
        user_repo: MockUserRepository,
        course_repo: MockCourseRepository,
        store: Arc<InMemoryEntitlementStore>,
        gateway: MockGateway,
    ) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            Arc::new(user_repo),
            Arc::new(course_repo),
            store,
            Arc::new(gateway),
            CheckoutUrls::from_client_url("https://app.example.com/"),
        )
    }

    #[tokio::test]
    async fn checkout_returns_redirect_url() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let handler = handler_with(
            MockUserRepository::with_user(7),
            MockCourseRepository::with_course(1, Price::from_major_units(99.90).unwrap()),
            store.clone(),
            MockGateway::checkout_ok("cs_test_123", "https://pay.example.com/cs_test_123"),
        );

        let result = handler
            .handle(CreateCheckoutCommand {
                user_id: UserId::new(7),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap();

        assert_eq!(result.redirect_url, "https://pay.example.com/cs_test_123");
        assert_eq!(result.session_id, "cs_test_123");

        // Pending purchase recorded with the session reference.
        let entitlement = store
            .find(UserId::new(7), CourseId::new(1))
            .await
            .unwrap()
            .unwrap();
        assert!(!entitlement.is_approved());
        assert_eq!(entitlement.external_reference.as_deref(), Some("cs_test_123"));
    }

    #[tokio::test]
    async fn checkout_rejects_unknown_course() {
        let handler = handler_with(
            MockUserRepository::with_user(7),
            MockCourseRepository::empty(),
            Arc::new(InMemoryEntitlementStore::new()),
            MockGateway::checkout_ok("cs_x", "https://pay.example.com/x"),
        );

        let err = handler
            .handle(CreateCheckoutCommand {
                user_id: UserId::new(7),
                course_id: CourseId::new(99),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EnrollmentError::CourseNotFound(_)));
    }

    #[tokio::test]
    async fn checkout_rejects_unknown_user() {
        let handler = handler_with(
            MockUserRepository::empty(),
            MockCourseRepository::with_course(1, Price::from_cents(9990).unwrap()),
            Arc::new(InMemoryEntitlementStore::new()),
            MockGateway::checkout_ok("cs_x", "https://pay.example.com/x"),
        );

        let err = handler
            .handle(CreateCheckoutCommand {
                user_id: UserId::new(42),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EnrollmentError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn checkout_rejects_already_purchased_course() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        store
            .grant(UserId::new(7), CourseId::new(1), None)
            .await
            .unwrap();

        let handler = handler_with(
            MockUserRepository::with_user(7),
            MockCourseRepository::with_course(1, Price::from_cents(9990).unwrap()),
            store,
            MockGateway::checkout_ok("cs_x", "https://pay.example.com/x"),
        );

        let err = handler
            .handle(CreateCheckoutCommand {
                user_id: UserId::new(7),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EnrollmentError::AlreadyPurchased { .. }));
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_as_retryable_dependency_error() {
        let handler = handler_with(
            MockUserRepository::with_user(7),
            MockCourseRepository::with_course(1, Price::from_cents(9990).unwrap()),
            Arc::new(InMemoryEntitlementStore::new()),
            MockGateway::checkout_failing(),
        );

        let err = handler
            .handle(CreateCheckoutCommand {
                user_id: UserId::new(7),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EnrollmentError::GatewayUnavailable { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn checkout_urls_are_derived_from_client_url() {
        let urls = CheckoutUrls::from_client_url("https://app.example.com");
        assert_eq!(urls.success_url, "https://app.example.com/success");
        assert_eq!(urls.cancel_url, "https://app.example.com/cancel");
    }
}
