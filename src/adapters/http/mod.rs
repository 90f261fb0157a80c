//! HTTP adapters: axum routes, handlers and DTOs per module.

pub mod certificates;
pub mod course;
pub mod enrollment;
pub mod middleware;
pub mod user;

use serde::{Deserialize, Serialize};

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
