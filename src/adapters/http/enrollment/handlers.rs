//! HTTP handlers for enrollment endpoints: checkout, webhook and access
//! control.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::enrollment::{
    CheckAccessHandler, CheckAccessQuery, CheckoutUrls, CreateCheckoutCommand,
    CreateCheckoutHandler, GrantCourseCommand, GrantCourseHandler, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, RevokeCourseCommand, RevokeCourseHandler,
};
use crate::domain::enrollment::EnrollmentError;
use crate::domain::foundation::{CourseId, UserId};
use crate::ports::{
    CourseRepository, EntitlementStore, IdempotencyGuard, PaymentGateway, UserRepository,
};

use super::dto::{
    AccessQueryParams, AccessRequest, AccessResponse, CheckoutRequest, CheckoutResponse,
    EntitlementResponse, WebhookAck,
};
use crate::adapters::http::middleware::RequireAdmin;
use crate::adapters::http::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the enrollment module, cloned per request.
#[derive(Clone)]
pub struct EnrollmentAppState {
    pub user_repository: Arc<dyn UserRepository>,
    pub course_repository: Arc<dyn CourseRepository>,
    pub entitlement_store: Arc<dyn EntitlementStore>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    /// Payment-event namespace of the idempotency guard.
    pub payment_events: Arc<dyn IdempotencyGuard>,
    pub checkout_urls: CheckoutUrls,
}

impl EnrollmentAppState {
    pub fn checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.user_repository.clone(),
            self.course_repository.clone(),
            self.entitlement_store.clone(),
            self.payment_gateway.clone(),
            self.checkout_urls.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payment_gateway.clone(),
            self.payment_events.clone(),
            self.entitlement_store.clone(),
            self.user_repository.clone(),
            self.course_repository.clone(),
        )
    }

    pub fn grant_handler(&self) -> GrantCourseHandler {
        GrantCourseHandler::new(
            self.user_repository.clone(),
            self.course_repository.clone(),
            self.entitlement_store.clone(),
        )
    }

    pub fn revoke_handler(&self) -> RevokeCourseHandler {
        RevokeCourseHandler::new(self.entitlement_store.clone())
    }

    pub fn access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(self.entitlement_store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/enrollments/checkout
pub async fn create_checkout(
    State(state): State<EnrollmentAppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, EnrollmentApiError> {
    let result = state
        .checkout_handler()
        .handle(CreateCheckoutCommand {
            user_id: UserId::new(request.user_id),
            course_id: CourseId::new(request.course_id),
        })
        .await?;

    Ok(Json(CheckoutResponse {
        redirect_url: result.redirect_url,
    }))
}

/// POST /api/webhooks/payment
///
/// Every structurally valid event is acknowledged with 200 so the provider
/// stops retrying, including no-op outcomes. Only signature verification
/// failure is a 400; a grant that could not be committed is a 500 so the
/// provider retries (the idempotency claim was released).
pub async fn handle_payment_webhook(
    State(state): State<EnrollmentAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, EnrollmentApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(EnrollmentError::invalid_webhook_signature)?;

    state
        .webhook_handler()
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature: signature.to_string(),
        })
        .await?;

    Ok(Json(WebhookAck::ok()))
}

/// POST /api/enrollments/grant (admin)
pub async fn grant_access(
    State(state): State<EnrollmentAppState>,
    _admin: RequireAdmin,
    Json(request): Json<AccessRequest>,
) -> Result<impl IntoResponse, EnrollmentApiError> {
    let entitlement = state
        .grant_handler()
        .handle(GrantCourseCommand {
            user_id: UserId::new(request.user_id),
            course_id: CourseId::new(request.course_id),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EntitlementResponse::from(entitlement)),
    ))
}

/// POST /api/enrollments/revoke (admin)
pub async fn revoke_access(
    State(state): State<EnrollmentAppState>,
    _admin: RequireAdmin,
    Json(request): Json<AccessRequest>,
) -> Result<impl IntoResponse, EnrollmentApiError> {
    state
        .revoke_handler()
        .handle(RevokeCourseCommand {
            user_id: UserId::new(request.user_id),
            course_id: CourseId::new(request.course_id),
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/enrollments/access
pub async fn check_access(
    State(state): State<EnrollmentAppState>,
    Query(params): Query<AccessQueryParams>,
) -> Result<impl IntoResponse, EnrollmentApiError> {
    let has_access = state
        .access_handler()
        .handle(CheckAccessQuery {
            user_id: UserId::new(params.user_id),
            course_id: CourseId::new(params.course_id),
        })
        .await?;

    Ok(Json(AccessResponse { has_access }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type converting enrollment errors to HTTP responses.
pub struct EnrollmentApiError(EnrollmentError);

impl From<EnrollmentError> for EnrollmentApiError {
    fn from(err: EnrollmentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for EnrollmentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            EnrollmentError::CourseNotFound(_)
            | EnrollmentError::UserNotFound(_)
            | EnrollmentError::NotEnrolled { .. } => StatusCode::NOT_FOUND,
            EnrollmentError::AlreadyPurchased { .. } => StatusCode::CONFLICT,
            EnrollmentError::InvalidWebhookSignature => StatusCode::BAD_REQUEST,
            EnrollmentError::PaymentFailed { .. } => StatusCode::PAYMENT_REQUIRED,
            EnrollmentError::GatewayUnavailable { .. } => StatusCode::BAD_GATEWAY,
            EnrollmentError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrollment_errors_map_to_expected_status_codes() {
        let user = UserId::new(7);
        let course = CourseId::new(1);
        let cases = [
            (
                EnrollmentError::course_not_found(course),
                StatusCode::NOT_FOUND,
            ),
            (
                EnrollmentError::already_purchased(user, course),
                StatusCode::CONFLICT,
            ),
            (
                EnrollmentError::invalid_webhook_signature(),
                StatusCode::BAD_REQUEST,
            ),
            (
                EnrollmentError::gateway_unavailable("timeout"),
                StatusCode::BAD_GATEWAY,
            ),
            (
                EnrollmentError::infrastructure("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = EnrollmentApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
