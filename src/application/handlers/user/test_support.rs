//! Shared mocks for user handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::Role;
use crate::ports::{AuthError, CredentialHasher, EmailMessage, Mailer, TokenClaims, TokenService};

/// Reversible "hash" so tests can assert on stored values.
pub struct MockHasher;

impl CredentialHasher for MockHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash == format!("hashed:{}", password))
    }
}

/// Token service issuing transparent tokens of the form
/// `session:<id>:<role>` and `reset:<id>`.
pub struct MockTokenService;

impl TokenService for MockTokenService {
    fn issue_session(&self, user_id: UserId, role: Role) -> Result<String, AuthError> {
        Ok(format!("session:{}:{}", user_id, role))
    }

    fn validate_session(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut parts = token.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("session"), Some(id), Some(role)) => Ok(TokenClaims {
                user_id: id.parse().map_err(|_| AuthError::InvalidToken)?,
                role: Role::parse(role).map_err(|_| AuthError::InvalidToken)?,
                jti: format!("jti-{}", id),
                expires_at: 4_102_444_800, // far future
            }),
            _ => Err(AuthError::InvalidToken),
        }
    }

    fn issue_reset(&self, user_id: UserId) -> Result<String, AuthError> {
        Ok(format!("reset:{}", user_id))
    }

    fn validate_reset(&self, token: &str) -> Result<UserId, AuthError> {
        token
            .strip_prefix("reset:")
            .and_then(|id| id.parse().ok())
            .ok_or(AuthError::InvalidToken)
    }
}

/// Mailer that records every message instead of sending it.
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl Default for RecordingMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}
