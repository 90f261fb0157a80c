//! PaymentGateway port - external checkout and webhook verification.
//!
//! Defines the contract for payment provider integrations. The interface is
//! provider-agnostic: one-off checkout sessions priced in minor units, with
//! correlation metadata echoed back through webhooks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::course::Price;
use crate::domain::enrollment::PaymentEvent;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, UserId};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a checkout session for a single course purchase.
    ///
    /// The session carries one line item at the course price in the
    /// provider's minor-unit convention, `{user_id, course_id}` metadata
    /// for webhook correlation, and success/cancel redirect targets.
    /// Returns the provider-hosted redirect URL.
    async fn create_checkout(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError>;

    /// Verify a webhook signature and decode the event.
    ///
    /// Returns the normalized event if the signature is valid; fails with
    /// an `InvalidWebhook` error otherwise. Verification failures must be
    /// rejected outright (the provider retries on its own schedule).
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<PaymentEvent, GatewayError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Internal user id (embedded in metadata).
    pub user_id: UserId,

    /// Internal course id (embedded in metadata).
    pub course_id: CourseId,

    /// Course title shown on the provider's checkout page.
    pub course_title: String,

    /// Course description shown on the provider's checkout page.
    pub course_description: String,

    /// Price of the single line item.
    pub price: Price,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,
}

/// Checkout session returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session id.
    pub id: String,

    /// Provider-hosted URL the payer is redirected to.
    pub url: String,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidWebhook, message)
    }

    /// Create a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }

    /// True iff this error means the webhook must be rejected with 400.
    pub fn is_invalid_webhook(&self) -> bool {
        self.code == GatewayErrorCode::InvalidWebhook
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        let code = match err.code {
            GatewayErrorCode::InvalidWebhook => ErrorCode::InvalidWebhookSignature,
            GatewayErrorCode::AuthenticationError | GatewayErrorCode::ProviderError => {
                ErrorCode::ExternalServiceError
            }
            GatewayErrorCode::NetworkError => ErrorCode::ExternalServiceError,
            GatewayErrorCode::Unknown => ErrorCode::InternalError,
        };
        DomainError::new(code, err.message)
    }
}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayErrorCode::NetworkError)
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::InvalidWebhook => "invalid_webhook",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
