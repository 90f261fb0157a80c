//! Axum router configuration for enrollment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    check_access, create_checkout, grant_access, handle_payment_webhook, revoke_access,
    EnrollmentAppState,
};

/// Create the enrollment API router, mounted at `/api/enrollments`.
///
/// # Routes
/// - `POST /checkout` - Start a course purchase, returns the redirect URL
/// - `GET /access` - Check whether a user may access a course
/// - `POST /grant` - Grant access directly (admin)
/// - `POST /revoke` - Revoke access (admin)
pub fn enrollment_routes() -> Router<EnrollmentAppState> {
    Router::new()
        .route("/checkout", post(create_checkout))
        .route("/access", get(check_access))
        .route("/grant", post(grant_access))
        .route("/revoke", post(revoke_access))
}

/// Create the payment webhook router, mounted at `/api/webhooks`.
///
/// Separate from the enrollment routes because webhook calls are
/// authenticated by signature, not by session token.
///
/// # Routes
/// - `POST /payment` - Payment provider webhook
pub fn webhook_routes() -> Router<EnrollmentAppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}
