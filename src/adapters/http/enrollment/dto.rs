//! Request/response DTOs for enrollment endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::enrollment::Entitlement;

/// POST /api/enrollments/checkout request.
///
/// Accepts both snake_case and the legacy camelCase field names.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(alias = "userId")]
    pub user_id: i64,
    #[serde(alias = "courseId")]
    pub course_id: i64,
}

/// POST /api/enrollments/checkout response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub redirect_url: String,
}

/// POST /api/enrollments/grant and /revoke request.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessRequest {
    #[serde(alias = "userId")]
    pub user_id: i64,
    #[serde(alias = "courseId")]
    pub course_id: i64,
}

/// GET /api/enrollments/access query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessQueryParams {
    #[serde(alias = "userId")]
    pub user_id: i64,
    #[serde(alias = "courseId")]
    pub course_id: i64,
}

/// GET /api/enrollments/access response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResponse {
    pub has_access: bool,
}

/// Entitlement representation in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementResponse {
    pub user_id: i64,
    pub course_id: i64,
    pub status: String,
    pub external_reference: Option<String>,
}

impl From<Entitlement> for EntitlementResponse {
    fn from(entitlement: Entitlement) -> Self {
        Self {
            user_id: entitlement.user_id.as_i64(),
            course_id: entitlement.course_id.as_i64(),
            status: entitlement.status.as_str().to_string(),
            external_reference: entitlement.external_reference,
        }
    }
}

/// Webhook acknowledgment body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn ok() -> Self {
        Self { received: true }
    }
}
