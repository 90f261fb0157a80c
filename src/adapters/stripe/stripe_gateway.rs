//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentGateway` port against Stripe's checkout-session
//! API and webhook delivery.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp validation (5-minute window) for replay attack prevention
//! - Secrets handled via `secrecy::SecretString`

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::enrollment::{PaymentEvent, PaymentEventKind, PaymentMetadata};
use crate::ports::{CheckoutSession, CreateCheckoutRequest, GatewayError, PaymentGateway};

use super::webhook_types::{
    SignatureHeader, StripeCheckoutSessionResponse, StripePaymentIntent, StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Bounded timeout for provider API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// ISO currency code for line items.
    currency: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            currency: "brl".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the checkout currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Stripe implementation of the PaymentGateway port.
pub struct StripePaymentGateway {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentGateway {
    /// Create a new gateway with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            config,
            http_client,
        }
    }

    /// Verify webhook signature using HMAC-SHA256.
    fn verify_signature(
        &self,
        payload: &[u8],
        header: &SignatureHeader,
    ) -> Result<(), GatewayError> {
        // 1. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                age_secs = age,
                "Webhook event too old"
            );
            return Err(GatewayError::invalid_webhook(format!(
                "Event too old ({} seconds)",
                age
            )));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = header.timestamp,
                "Webhook event timestamp in future"
            );
            return Err(GatewayError::invalid_webhook("Event timestamp in future"));
        }

        // 2. Compute expected signature over "{timestamp}.{payload}"
        let signed_payload = format!(
            "{}.{}",
            header.timestamp,
            String::from_utf8_lossy(payload)
        );

        let mut mac =
            HmacSha256::new_from_slice(self.config.webhook_secret.expose_secret().as_bytes())
                .expect("HMAC accepts any key size");
        mac.update(signed_payload.as_bytes());
        let expected = mac.finalize().into_bytes();

        // 3. Constant-time comparison
        let expected_bytes: &[u8] = expected.as_slice();
        let provided_bytes: &[u8] = &header.v1_signature;

        if expected_bytes.len() != provided_bytes.len()
            || expected_bytes.ct_eq(provided_bytes).unwrap_u8() != 1
        {
            tracing::warn!("Invalid webhook signature");
            return Err(GatewayError::invalid_webhook("Invalid signature"));
        }

        Ok(())
    }

    /// Map a verified Stripe event to the normalized domain event.
    fn to_payment_event(&self, event: StripeWebhookEvent) -> Result<PaymentEvent, GatewayError> {
        let (kind, metadata, failure_reason) = match event.event_type.as_str() {
            "payment_intent.succeeded" => {
                let intent = parse_intent(&event)?;
                (
                    PaymentEventKind::PaymentSucceeded,
                    intent_metadata(&intent),
                    None,
                )
            }
            "payment_intent.payment_failed" => {
                let intent = parse_intent(&event)?;
                let reason = intent
                    .last_payment_error
                    .as_ref()
                    .and_then(|e| e.message.clone());
                (
                    PaymentEventKind::PaymentFailed,
                    intent_metadata(&intent),
                    reason,
                )
            }
            other => (
                PaymentEventKind::Unknown(other.to_string()),
                PaymentMetadata::default(),
                None,
            ),
        };

        Ok(PaymentEvent {
            id: event.id,
            kind,
            metadata,
            failure_reason,
            created_at: event.created,
        })
    }
}

fn parse_intent(event: &StripeWebhookEvent) -> Result<StripePaymentIntent, GatewayError> {
    serde_json::from_value(event.data.object.clone())
        .map_err(|e| GatewayError::invalid_webhook(format!("Invalid payment intent: {}", e)))
}

fn intent_metadata(intent: &StripePaymentIntent) -> PaymentMetadata {
    PaymentMetadata {
        user_id: intent.metadata.get("user_id").cloned(),
        course_id: intent.metadata.get("course_id").cloned(),
    }
}

#[async_trait]
impl PaymentGateway for StripePaymentGateway {
    async fn create_checkout(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let unit_amount = request.price.as_minor_units().to_string();
        let params = vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("payment_method_types[1]", "boleto".to_string()),
            (
                "line_items[0][price_data][currency]",
                self.config.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                request.course_title.clone(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                request.course_description.clone(),
            ),
            ("line_items[0][price_data][unit_amount]", unit_amount),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("metadata[user_id]", request.user_id.to_string()),
            ("metadata[course_id]", request.course_id.to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::network(format!("Stripe request timed out: {}", e))
                } else {
                    GatewayError::network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Stripe checkout session creation failed");
            return Err(GatewayError::provider(format!(
                "Stripe API error: {}",
                error_text
            )));
        }

        let session: StripeCheckoutSessionResponse = response.json().await.map_err(|e| {
            GatewayError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<PaymentEvent, GatewayError> {
        let header = SignatureHeader::parse(signature)
            .map_err(|e| GatewayError::invalid_webhook(e.to_string()))?;

        self.verify_signature(payload, &header)?;

        let event: StripeWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| GatewayError::invalid_webhook(format!("Invalid JSON: {}", e)))?;

        self.to_payment_event(event)
    }
}

/// Computes a valid signature header for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    super::webhook_types::hex_encode(&mac.finalize().into_bytes())
}
