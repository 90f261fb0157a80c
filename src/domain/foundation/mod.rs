//! Foundation value objects and errors shared by every domain module.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CourseId, QuestionId, UserId};
pub use timestamp::Timestamp;
