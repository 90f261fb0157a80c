//! User-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | DuplicateCpf / DuplicateEmail | 409 |
//! | InvalidCredentials | 401 |
//! | TokenExpired / TokenRevoked | 401 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};

/// User-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    /// User was not found.
    NotFound(UserId),

    /// No user registered under this email.
    NotFoundByEmail(String),

    /// A user with this CPF is already registered.
    DuplicateCpf(String),

    /// A user with this email is already registered.
    DuplicateEmail(String),

    /// Email/password combination did not match.
    InvalidCredentials,

    /// Presented token has expired.
    TokenExpired,

    /// Presented token was revoked on logout.
    TokenRevoked,

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl UserError {
    pub fn not_found(id: UserId) -> Self {
        UserError::NotFound(id)
    }

    pub fn not_found_by_email(email: impl Into<String>) -> Self {
        UserError::NotFoundByEmail(email.into())
    }

    pub fn duplicate_cpf(cpf: impl Into<String>) -> Self {
        UserError::DuplicateCpf(cpf.into())
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        UserError::DuplicateEmail(email.into())
    }

    pub fn invalid_credentials() -> Self {
        UserError::InvalidCredentials
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UserError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Lifts a value-object validation failure, keeping its field name.
    pub fn from_validation(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        UserError::ValidationFailed {
            field,
            message: err.to_string(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        UserError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => ErrorCode::UserNotFound,
            UserError::DuplicateCpf(_) | UserError::DuplicateEmail(_) => ErrorCode::DuplicateUser,
            UserError::InvalidCredentials => ErrorCode::InvalidCredentials,
            UserError::TokenExpired => ErrorCode::TokenExpired,
            UserError::TokenRevoked => ErrorCode::TokenRevoked,
            UserError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            UserError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            UserError::NotFound(id) => format!("User not found: {}", id),
            UserError::NotFoundByEmail(email) => {
                format!("No user registered with email {}", email)
            }
            UserError::DuplicateCpf(_) => {
                "A user with this CPF is already registered".to_string()
            }
            UserError::DuplicateEmail(_) => {
                "A user with this email is already registered".to_string()
            }
            // Deliberately vague so login does not leak which field was wrong.
            UserError::InvalidCredentials => "Invalid email or password".to_string(),
            UserError::TokenExpired => "Session token has expired".to_string(),
            UserError::TokenRevoked => "Session token has been revoked".to_string(),
            UserError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            UserError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for UserError {}

impl From<DomainError> for UserError {
    fn from(err: DomainError) -> Self {
        match err.code {
            // The store reports which unique constraint tripped via the
            // "field" detail.
            ErrorCode::DuplicateUser => match err.details.get("field").map(String::as_str) {
                Some("email") => UserError::DuplicateEmail(String::new()),
                _ => UserError::DuplicateCpf(String::new()),
            },
            ErrorCode::ValidationFailed => UserError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::TokenExpired => UserError::TokenExpired,
            ErrorCode::TokenRevoked => UserError::TokenRevoked,
            _ => UserError::Infrastructure(err.to_string()),
        }
    }
}

impl From<UserError> for DomainError {
    fn from(err: UserError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_id() {
        let err = UserError::not_found(UserId::new(9));
        assert_eq!(err.code(), ErrorCode::UserNotFound);
        assert!(err.message().contains('9'));
    }

    #[test]
    fn duplicate_cpf_does_not_leak_the_cpf() {
        let err = UserError::duplicate_cpf("12345678901");
        assert_eq!(err.code(), ErrorCode::DuplicateUser);
        assert!(!err.message().contains("12345678901"));
    }

    #[test]
    fn invalid_credentials_message_is_vague() {
        let err = UserError::invalid_credentials();
        let msg = err.message();
        assert!(!msg.to_lowercase().contains("email not found"));
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    }

    #[test]
    fn validation_carries_field_and_message() {
        let err = UserError::validation("cpf", "must be 11 digits");
        assert!(err.message().contains("cpf"));
        assert!(err.message().contains("11 digits"));
    }

    #[test]
    fn converts_to_domain_error() {
        let err = UserError::not_found(UserId::new(1));
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, err.code());
    }

    #[test]
    fn converts_from_domain_validation_error() {
        let domain = DomainError::validation("email", "missing @ symbol");
        let err: UserError = domain.into();
        assert!(matches!(err, UserError::ValidationFailed { ref field, .. } if field == "email"));
    }
}
