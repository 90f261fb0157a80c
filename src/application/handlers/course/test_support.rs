//! Shared mocks for course handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::course::{NewQuestion, Question, QuestionUpdate};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, QuestionId, Timestamp};
use crate::ports::QuestionRepository;

/// Vec-backed question repository.
pub struct InMemoryQuestionRepository {
    questions: Mutex<Vec<Question>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self {
            questions: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryQuestionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: NewQuestion) -> Result<Question, DomainError> {
        let mut questions = self.questions.lock().unwrap();
        let created = Question {
            id: QuestionId::new(questions.len() as i64 + 1),
            course_id: question.course_id,
            title: question.title,
            options: question.options,
            answer: question.answer,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        questions.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, DomainError> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn list_for_course(&self, course_id: CourseId) -> Result<Vec<Question>, DomainError> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: QuestionId,
        update: QuestionUpdate,
    ) -> Result<Question, DomainError> {
        let mut questions = self.questions.lock().unwrap();
        match questions.iter_mut().find(|q| q.id == id) {
            Some(question) => {
                question.apply_update(update, Timestamp::now());
                Ok(question.clone())
            }
            None => Err(DomainError::new(
                ErrorCode::QuestionNotFound,
                "Question not found",
            )),
        }
    }

    async fn delete(&self, id: QuestionId) -> Result<(), DomainError> {
        let mut questions = self.questions.lock().unwrap();
        let before = questions.len();
        questions.retain(|q| q.id != id);
        if questions.len() == before {
            return Err(DomainError::new(
                ErrorCode::QuestionNotFound,
                "Question not found",
            ));
        }
        Ok(())
    }
}
