//! HandlePaymentWebhookHandler - Command handler for payment provider webhooks.
//!
//! The unlock workflow per (user, course, event) tuple:
//!
//! ```text
//! received -> signature-verified -> deduplicated -> entitlement-resolved
//!          -> granted | rejected
//! ```
//!
//! The provider retries any non-2xx response indefinitely, so every
//! structurally valid event is acknowledged even when the business action is
//! a no-op. Only signature verification failure is rejected outright; that
//! is a protocol fault, not a business one.

use std::sync::Arc;

use crate::domain::enrollment::{EnrollmentError, PaymentEvent, PaymentEventKind};
use crate::domain::foundation::{CourseId, UserId};
use crate::ports::{
    CourseRepository, EntitlementStore, IdempotencyGuard, PaymentGateway, UserRepository,
};

/// Command to process one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload, exactly as received.
    pub payload: Vec<u8>,
    /// Provider signature header.
    pub signature: String,
}

/// Terminal state of the unlock workflow for one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// Payment confirmed and entitlement granted.
    Granted { user_id: UserId, course_id: CourseId },

    /// Duplicate delivery; the event was already claimed.
    AlreadyProcessed { event_id: String },

    /// Failed payment recorded; no entitlement mutation.
    FailureRecorded { reason: String },

    /// Metadata did not carry resolvable ids; logged for manual follow-up.
    MissingMetadata { event_id: String },

    /// Course or user no longer exists; logged for manual follow-up.
    MissingRecord { event_id: String },

    /// Unknown event type; acknowledged without action.
    Ignored { event_type: String },
}

/// Handler for verified payment webhooks.
///
/// Errors returned from `handle` become non-2xx responses; everything the
/// provider should stop retrying terminates as an `Ok` result instead.
pub struct HandlePaymentWebhookHandler {
    payment_gateway: Arc<dyn PaymentGateway>,
    idempotency_guard: Arc<dyn IdempotencyGuard>,
    entitlement_store: Arc<dyn EntitlementStore>,
    user_repository: Arc<dyn UserRepository>,
    course_repository: Arc<dyn CourseRepository>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        payment_gateway: Arc<dyn PaymentGateway>,
        idempotency_guard: Arc<dyn IdempotencyGuard>,
        entitlement_store: Arc<dyn EntitlementStore>,
        user_repository: Arc<dyn UserRepository>,
        course_repository: Arc<dyn CourseRepository>,
    ) -> Self {
        Self {
            payment_gateway,
            idempotency_guard,
            entitlement_store,
            user_repository,
            course_repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, EnrollmentError> {
        // 1. Verify signature and decode. Any verification or parse failure
        //    is a protocol-level rejection.
        let event = self
            .payment_gateway
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook rejected");
                EnrollmentError::invalid_webhook_signature()
            })?;

        match event.kind.clone() {
            PaymentEventKind::PaymentSucceeded => self.handle_payment_succeeded(&event).await,
            PaymentEventKind::PaymentFailed => self.handle_payment_failed(&event).await,
            PaymentEventKind::Unknown(event_type) => {
                tracing::debug!(
                    event_id = %event.id,
                    event_type = %event_type,
                    "Unhandled webhook event type acknowledged"
                );
                Ok(HandlePaymentWebhookResult::Ignored { event_type })
            }
        }
    }

    async fn handle_payment_succeeded(
        &self,
        event: &PaymentEvent,
    ) -> Result<HandlePaymentWebhookResult, EnrollmentError> {
        // 2. Deduplicate. A guard outage fails the delivery so the provider
        //    retries once the guard is back; nothing was mutated yet.
        let first_claim = self
            .idempotency_guard
            .claim(&event.id)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))?;

        if !first_claim {
            tracing::info!(event_id = %event.id, "Duplicate webhook delivery skipped");
            return Ok(HandlePaymentWebhookResult::AlreadyProcessed {
                event_id: event.id.clone(),
            });
        }

        // 3. Resolve metadata into typed ids.
        let Some((user_id, course_id)) = event.metadata.resolve_ids() else {
            tracing::warn!(
                event_id = %event.id,
                metadata = ?event.metadata,
                "Payment event metadata missing or invalid; manual follow-up required"
            );
            return Ok(HandlePaymentWebhookResult::MissingMetadata {
                event_id: event.id.clone(),
            });
        };

        // 4. Resolve course and user existence.
        let course = match self.course_repository.find_by_id(course_id).await {
            Ok(course) => course,
            Err(e) => return Err(self.release_and_fail(&event.id, e.to_string()).await),
        };
        if course.is_none() {
            tracing::warn!(
                event_id = %event.id,
                course_id = %course_id,
                "Paid course no longer exists; manual follow-up required"
            );
            return Ok(HandlePaymentWebhookResult::MissingRecord {
                event_id: event.id.clone(),
            });
        }

        let user = match self.user_repository.find_by_id(user_id).await {
            Ok(user) => user,
            Err(e) => return Err(self.release_and_fail(&event.id, e.to_string()).await),
        };
        if user.is_none() {
            tracing::warn!(
                event_id = %event.id,
                user_id = %user_id,
                "Paying user no longer exists; manual follow-up required"
            );
            return Ok(HandlePaymentWebhookResult::MissingRecord {
                event_id: event.id.clone(),
            });
        }

        // 5. Commit the grant. On a store failure the claim is released and
        //    the delivery fails, so the provider's retry can re-attempt.
        match self
            .entitlement_store
            .grant(user_id, course_id, Some(&event.id))
            .await
        {
            Ok(entitlement) => {
                tracing::info!(
                    event_id = %event.id,
                    user_id = %user_id,
                    course_id = %course_id,
                    status = %entitlement.status,
                    "Course unlocked"
                );
                Ok(HandlePaymentWebhookResult::Granted { user_id, course_id })
            }
            Err(e) => Err(self.release_and_fail(&event.id, e.to_string()).await),
        }
    }

    async fn handle_payment_failed(
        &self,
        event: &PaymentEvent,
    ) -> Result<HandlePaymentWebhookResult, EnrollmentError> {
        let reason = event
            .failure_reason
            .clone()
            .unwrap_or_else(|| "unknown".to_string());

        tracing::warn!(
            event_id = %event.id,
            reason = %reason,
            "Payment failed"
        );

        // Best-effort bookkeeping; a failed payment never mutates an
        // approved entitlement, and a write failure must not turn a no-op
        // event into a retry loop.
        if let Some((user_id, course_id)) = event.metadata.resolve_ids() {
            if let Err(e) = self.entitlement_store.mark_failed(user_id, course_id).await {
                tracing::warn!(
                    event_id = %event.id,
                    error = %e,
                    "Failed to record payment failure"
                );
            }
        }

        Ok(HandlePaymentWebhookResult::FailureRecorded { reason })
    }

    /// Releases the idempotency claim after a failed mutation so the
    /// provider's retry is not swallowed by the guard.
    async fn release_and_fail(&self, event_id: &str, reason: String) -> EnrollmentError {
        if let Err(e) = self.idempotency_guard.release(event_id).await {
            tracing::error!(
                event_id = %event_id,
                error = %e,
                "Failed to release idempotency claim; retries of this event will be skipped"
            );
        }
        EnrollmentError::infrastructure(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::enrollment::test_support::{
        InMemoryEntitlementStore, InMemoryGuard, MockCourseRepository, MockGateway,
        MockUserRepository,
    };
    use crate::domain::course::Price;
    use crate::domain::enrollment::PaymentMetadata;

    fn succeeded_event(event_id: &str, user_id: &str, course_id: &str) -> PaymentEvent {
        PaymentEvent {
            id: event_id.to_string(),
            kind: PaymentEventKind::PaymentSucceeded,
            metadata: PaymentMetadata {
                user_id: Some(user_id.to_string()),
                course_id: Some(course_id.to_string()),
            },
            failure_reason: None,
            created_at: 1_700_000_000,
        }
    }

    fn command() -> HandlePaymentWebhookCommand {
        HandlePaymentWebhookCommand {
            payload: br#"{"id":"evt_1"}"#.to_vec(),
            signature: "t=1,v1=stub".to_string(),
        }
    }

    struct Fixture {
        store: Arc<InMemoryEntitlementStore>,
        guard: Arc<InMemoryGuard>,
    }

    fn handler_for(event_gateway: MockGateway) -> (HandlePaymentWebhookHandler, Fixture) {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let guard = Arc::new(InMemoryGuard::new());
        let handler = HandlePaymentWebhookHandler::new(
            Arc::new(event_gateway),
            guard.clone(),
            store.clone(),
            Arc::new(MockUserRepository::with_user(7)),
            Arc::new(MockCourseRepository::with_course(
                1,
                Price::from_major_units(99.90).unwrap(),
            )),
        );
        (handler, Fixture { store, guard })
    }

    #[tokio::test]
    async fn successful_payment_grants_entitlement() {
        let (handler, fixture) = handler_for(MockGateway::webhook_event(succeeded_event(
            "evt_1", "7", "1",
        )));

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::Granted {
                user_id: UserId::new(7),
                course_id: CourseId::new(1),
            }
        );
        assert!(fixture
            .store
            .has(UserId::new(7), CourseId::new(1))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn replayed_delivery_grants_exactly_once() {
        let (handler, fixture) = handler_for(MockGateway::webhook_event(succeeded_event(
            "evt_1", "7", "1",
        )));

        // Same payload delivered three times.
        let first = handler.handle(command()).await.unwrap();
        let second = handler.handle(command()).await.unwrap();
        let third = handler.handle(command()).await.unwrap();

        assert!(matches!(first, HandlePaymentWebhookResult::Granted { .. }));
        assert!(matches!(
            second,
            HandlePaymentWebhookResult::AlreadyProcessed { .. }
        ));
        assert!(matches!(
            third,
            HandlePaymentWebhookResult::AlreadyProcessed { .. }
        ));

        // Exactly one approved row.
        assert_eq!(fixture.store.approved_count(), 1);
        assert!(fixture
            .store
            .has(UserId::new(7), CourseId::new(1))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn invalid_signature_is_rejected_without_mutation() {
        let (handler, fixture) = handler_for(MockGateway::webhook_invalid());

        let err = handler.handle(command()).await.unwrap_err();

        assert!(matches!(err, EnrollmentError::InvalidWebhookSignature));
        assert_eq!(fixture.store.approved_count(), 0);
        assert!(!fixture.guard.is_claimed("evt_1").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_event_type_is_acknowledged_without_mutation() {
        let event = PaymentEvent {
            id: "evt_2".to_string(),
            kind: PaymentEventKind::Unknown("payment_intent.created".to_string()),
            metadata: PaymentMetadata {
                user_id: Some("7".to_string()),
                course_id: Some("1".to_string()),
            },
            failure_reason: None,
            created_at: 1_700_000_000,
        };
        let (handler, fixture) = handler_for(MockGateway::webhook_event(event));

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::Ignored {
                event_type: "payment_intent.created".to_string()
            }
        );
        assert_eq!(fixture.store.approved_count(), 0);
    }

    #[tokio::test]
    async fn failed_payment_is_logged_and_acknowledged() {
        let event = PaymentEvent {
            id: "evt_3".to_string(),
            kind: PaymentEventKind::PaymentFailed,
            metadata: PaymentMetadata {
                user_id: Some("7".to_string()),
                course_id: Some("1".to_string()),
            },
            failure_reason: Some("card declined".to_string()),
            created_at: 1_700_000_000,
        };
        let (handler, fixture) = handler_for(MockGateway::webhook_event(event));

        let result = handler.handle(command()).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::FailureRecorded {
                reason: "card declined".to_string()
            }
        );
        assert_eq!(fixture.store.approved_count(), 0);
    }

    #[tokio::test]
    async fn missing_metadata_is_acknowledged_for_manual_follow_up() {
        let event = PaymentEvent {
            id: "evt_4".to_string(),
            kind: PaymentEventKind::PaymentSucceeded,
            metadata: PaymentMetadata::default(),
            failure_reason: None,
            created_at: 1_700_000_000,
        };
        let (handler, fixture) = handler_for(MockGateway::webhook_event(event));

        let result = handler.handle(command()).await.unwrap();

        assert!(matches!(
            result,
            HandlePaymentWebhookResult::MissingMetadata { .. }
        ));
        assert_eq!(fixture.store.approved_count(), 0);
    }

    #[tokio::test]
    async fn missing_course_is_acknowledged_for_manual_follow_up() {
        let event = succeeded_event("evt_5", "7", "999");
        let (handler, fixture) = handler_for(MockGateway::webhook_event(event));

        let result = handler.handle(command()).await.unwrap();

        assert!(matches!(
            result,
            HandlePaymentWebhookResult::MissingRecord { .. }
        ));
        assert_eq!(fixture.store.approved_count(), 0);
    }

    #[tokio::test]
    async fn grant_failure_releases_claim_so_retry_can_succeed() {
        let (handler, fixture) = handler_for(MockGateway::webhook_event(succeeded_event(
            "evt_6", "7", "1",
        )));

        // First delivery hits a store outage.
        fixture.store.set_fail_grants(true);
        let err = handler.handle(command()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(!fixture.guard.is_claimed("evt_6").await.unwrap());

        // Provider retries once the store is back; the grant lands.
        fixture.store.set_fail_grants(false);
        let result = handler.handle(command()).await.unwrap();
        assert!(matches!(result, HandlePaymentWebhookResult::Granted { .. }));
        assert_eq!(fixture.store.approved_count(), 1);
    }

    #[tokio::test]
    async fn grant_is_idempotent_for_already_granted_pair() {
        let (handler, fixture) = handler_for(MockGateway::webhook_event(succeeded_event(
            "evt_7", "7", "1",
        )));

        // Administrative grant happened before the webhook arrived.
        fixture
            .store
            .grant(UserId::new(7), CourseId::new(1), None)
            .await
            .unwrap();

        let result = handler.handle(command()).await.unwrap();

        // Still a grant outcome, still exactly one row.
        assert!(matches!(result, HandlePaymentWebhookResult::Granted { .. }));
        assert_eq!(fixture.store.approved_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_deliveries_grant_once() {
        let (handler, fixture) = handler_for(MockGateway::webhook_event(succeeded_event(
            "evt_8", "7", "1",
        )));
        let handler = Arc::new(handler);

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(command()).await })
            })
            .collect();

        let mut granted = 0;
        for task in tasks {
            match task.await.unwrap().unwrap() {
                HandlePaymentWebhookResult::Granted { .. } => granted += 1,
                HandlePaymentWebhookResult::AlreadyProcessed { .. } => {}
                other => panic!("unexpected outcome: {:?}", other),
            }
        }

        assert_eq!(granted, 1, "exactly one delivery should perform the grant");
        assert_eq!(fixture.store.approved_count(), 1);
    }
}
