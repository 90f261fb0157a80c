//! TokenService port - session and password-reset token handling.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::user::Role;

/// Claims carried by a validated session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub role: Role,
    /// Unique token identifier, usable for revocation bookkeeping.
    pub jti: String,
    /// Expiration (UTC Unix seconds).
    pub expires_at: i64,
}

/// Errors from token validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token signature or structure is invalid.
    InvalidToken,

    /// Token has expired.
    TokenExpired,

    /// Token was revoked on logout.
    TokenRevoked,

    /// The token backend is unavailable.
    ServiceUnavailable(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::TokenExpired => write!(f, "Token expired"),
            AuthError::TokenRevoked => write!(f, "Token revoked"),
            AuthError::ServiceUnavailable(msg) => write!(f, "Auth unavailable: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Port for issuing and validating tokens.
///
/// Session tokens authenticate API requests; reset tokens authorize a
/// single password reset and live in a separate audience so one can never
/// stand in for the other.
pub trait TokenService: Send + Sync {
    /// Issue a session token for an authenticated user.
    fn issue_session(&self, user_id: UserId, role: Role) -> Result<String, AuthError>;

    /// Validate a session token and return its claims.
    fn validate_session(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Issue a short-lived password-reset token.
    fn issue_reset(&self, user_id: UserId) -> Result<String, AuthError>;

    /// Validate a reset token and return the user it belongs to.
    fn validate_reset(&self, token: &str) -> Result<UserId, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_service_is_object_safe() {
        fn _accepts_dyn(_service: &dyn TokenService) {}
    }

    #[test]
    fn auth_error_displays() {
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
        assert!(AuthError::ServiceUnavailable("redis down".to_string())
            .to_string()
            .contains("redis down"));
    }
}
