//! Course-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound / QuestionNotFound | 404 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, QuestionId};

/// Course-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseError {
    /// Course was not found.
    NotFound(CourseId),

    /// Question was not found.
    QuestionNotFound(QuestionId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl CourseError {
    pub fn not_found(id: CourseId) -> Self {
        CourseError::NotFound(id)
    }

    pub fn question_not_found(id: QuestionId) -> Self {
        CourseError::QuestionNotFound(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CourseError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CourseError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CourseError::NotFound(_) => ErrorCode::CourseNotFound,
            CourseError::QuestionNotFound(_) => ErrorCode::QuestionNotFound,
            CourseError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CourseError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            CourseError::NotFound(id) => format!("Course not found: {}", id),
            CourseError::QuestionNotFound(id) => format!("Question not found: {}", id),
            CourseError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CourseError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CourseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CourseError {}

impl From<DomainError> for CourseError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => CourseError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => CourseError::Infrastructure(err.to_string()),
        }
    }
}

impl From<CourseError> for DomainError {
    fn from(err: CourseError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_includes_id() {
        let err = CourseError::not_found(CourseId::new(4));
        assert_eq!(err.code(), ErrorCode::CourseNotFound);
        assert!(err.message().contains('4'));
    }

    #[test]
    fn question_not_found_maps_to_its_own_code() {
        let err = CourseError::question_not_found(QuestionId::new(8));
        assert_eq!(err.code(), ErrorCode::QuestionNotFound);
    }

    #[test]
    fn display_matches_message() {
        let err = CourseError::validation("title", "cannot be empty");
        assert_eq!(format!("{}", err), err.message());
    }

    #[test]
    fn converts_to_domain_error() {
        let err = CourseError::not_found(CourseId::new(1));
        let domain: DomainError = err.clone().into();
        assert_eq!(domain.code, err.code());
    }
}
