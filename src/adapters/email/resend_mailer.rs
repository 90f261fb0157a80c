//! Resend implementation of the Mailer port.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{EmailMessage, Mailer};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Bounded timeout for mail API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resend-backed transactional mailer.
pub struct ResendMailer {
    api_key: SecretString,
    from: String,
    api_url: String,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

impl ResendMailer {
    /// Creates a mailer sending as the given From header value.
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            api_url: RESEND_API_URL.to_string(),
            http_client,
        }
    }

    /// Set a custom API URL (for testing).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        let body = SendRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            text: &message.text,
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("Mail delivery failed: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Resend rejected the message");
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Mail API error: {}", error_text),
            ));
        }

        Ok(())
    }
}
