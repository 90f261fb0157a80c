//! Mailer port - outbound transactional email.
//!
//! Email is an opaque side-effecting collaborator: a send failure is logged
//! and reported, but must never roll back the state change that triggered
//! it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// A transactional email ready to send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Port for sending transactional email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError>;
}
