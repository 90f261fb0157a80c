//! QuestionRepository port - persistence for quiz questions.

use async_trait::async_trait;

use crate::domain::course::{NewQuestion, Question, QuestionUpdate};
use crate::domain::foundation::{CourseId, DomainError, QuestionId};

/// Port for quiz question persistence.
///
/// Questions belong to exactly one course and disappear with it; the store
/// enforces the ownership through a cascading foreign key.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a new question and return it with its assigned id.
    ///
    /// Fails with `CourseNotFound` if the owning course does not exist.
    async fn create(&self, question: NewQuestion) -> Result<Question, DomainError>;

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, DomainError>;

    async fn list_for_course(&self, course_id: CourseId) -> Result<Vec<Question>, DomainError>;

    /// Apply a partial update, returning the updated question.
    async fn update(&self, id: QuestionId, update: QuestionUpdate)
        -> Result<Question, DomainError>;

    async fn delete(&self, id: QuestionId) -> Result<(), DomainError>;
}
