//! Command and query handlers for quiz questions.

use std::sync::Arc;

use crate::domain::course::{CourseError, NewQuestion, Question, QuestionUpdate};
use crate::domain::foundation::{CourseId, ErrorCode, QuestionId};
use crate::ports::{CourseRepository, QuestionRepository};

/// Command to attach a question to a course.
#[derive(Debug, Clone)]
pub struct AddQuestionCommand {
    pub course_id: CourseId,
    pub title: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Handler creating questions under an existing course.
pub struct AddQuestionHandler {
    course_repository: Arc<dyn CourseRepository>,
    question_repository: Arc<dyn QuestionRepository>,
}

impl AddQuestionHandler {
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        question_repository: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            course_repository,
            question_repository,
        }
    }

    pub async fn handle(&self, cmd: AddQuestionCommand) -> Result<Question, CourseError> {
        if self
            .course_repository
            .find_by_id(cmd.course_id)
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))?
            .is_none()
        {
            return Err(CourseError::not_found(cmd.course_id));
        }

        let question = NewQuestion::new(cmd.course_id, cmd.title, cmd.options, cmd.answer)
            .map_err(|e| CourseError::validation("question", e.to_string()))?;

        self.question_repository
            .create(question)
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))
    }
}

/// Handler listing the questions of a course.
pub struct ListQuestionsHandler {
    course_repository: Arc<dyn CourseRepository>,
    question_repository: Arc<dyn QuestionRepository>,
}

impl ListQuestionsHandler {
    pub fn new(
        course_repository: Arc<dyn CourseRepository>,
        question_repository: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            course_repository,
            question_repository,
        }
    }

    pub async fn handle(&self, course_id: CourseId) -> Result<Vec<Question>, CourseError> {
        if self
            .course_repository
            .find_by_id(course_id)
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))?
            .is_none()
        {
            return Err(CourseError::not_found(course_id));
        }

        self.question_repository
            .list_for_course(course_id)
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))
    }
}

/// Command to update a question.
#[derive(Debug, Clone)]
pub struct UpdateQuestionCommand {
    pub question_id: QuestionId,
    pub title: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
}

/// Handler applying partial question updates.
pub struct UpdateQuestionHandler {
    question_repository: Arc<dyn QuestionRepository>,
}

impl UpdateQuestionHandler {
    pub fn new(question_repository: Arc<dyn QuestionRepository>) -> Self {
        Self { question_repository }
    }

    pub async fn handle(&self, cmd: UpdateQuestionCommand) -> Result<Question, CourseError> {
        if let Some(options) = &cmd.options {
            if options.len() < 2 {
                return Err(CourseError::validation(
                    "options",
                    "a question needs at least two options",
                ));
            }
        }

        self.question_repository
            .update(
                cmd.question_id,
                QuestionUpdate {
                    title: cmd.title,
                    options: cmd.options,
                    answer: cmd.answer,
                },
            )
            .await
            .map_err(|e| match e.code {
                ErrorCode::QuestionNotFound => CourseError::question_not_found(cmd.question_id),
                _ => CourseError::infrastructure(e.to_string()),
            })
    }
}

/// Handler deleting a question.
pub struct DeleteQuestionHandler {
    question_repository: Arc<dyn QuestionRepository>,
}

impl DeleteQuestionHandler {
    pub fn new(question_repository: Arc<dyn QuestionRepository>) -> Self {
        Self { question_repository }
    }

    pub async fn handle(&self, id: QuestionId) -> Result<(), CourseError> {
        self.question_repository
            .delete(id)
            .await
            .map_err(|e| match e.code {
                ErrorCode::QuestionNotFound => CourseError::question_not_found(id),
                _ => CourseError::infrastructure(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::course::test_support::InMemoryQuestionRepository;
    use crate::application::handlers::enrollment::test_support::MockCourseRepository;
    use crate::domain::course::Price;

    fn add_handler(
        courses: MockCourseRepository,
        questions: Arc<InMemoryQuestionRepository>,
    ) -> AddQuestionHandler {
        AddQuestionHandler::new(Arc::new(courses), questions)
    }

    fn command(course_id: i64) -> AddQuestionCommand {
        AddQuestionCommand {
            course_id: CourseId::new(course_id),
            title: "Como Rust gerencia memória?".to_string(),
            options: vec!["ownership".to_string(), "GC".to_string()],
            answer: "ownership".to_string(),
        }
    }

    #[tokio::test]
    async fn add_question_to_existing_course() {
        let questions = Arc::new(InMemoryQuestionRepository::new());
        let handler = add_handler(
            MockCourseRepository::with_course(1, Price::from_cents(0).unwrap()),
            questions.clone(),
        );

        let question = handler.handle(command(1)).await.unwrap();

        assert_eq!(question.course_id, CourseId::new(1));
        assert_eq!(
            questions
                .list_for_course(CourseId::new(1))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn add_question_to_missing_course_is_not_found() {
        let handler = add_handler(
            MockCourseRepository::empty(),
            Arc::new(InMemoryQuestionRepository::new()),
        );

        let err = handler.handle(command(9)).await.unwrap_err();

        assert!(matches!(err, CourseError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_questions_requires_the_course() {
        let handler = ListQuestionsHandler::new(
            Arc::new(MockCourseRepository::empty()),
            Arc::new(InMemoryQuestionRepository::new()),
        );

        let err = handler.handle(CourseId::new(1)).await.unwrap_err();

        assert!(matches!(err, CourseError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_question_applies_changes() {
        let questions = Arc::new(InMemoryQuestionRepository::new());
        let add = add_handler(
            MockCourseRepository::with_course(1, Price::from_cents(0).unwrap()),
            questions.clone(),
        );
        let created = add.handle(command(1)).await.unwrap();

        let updated = UpdateQuestionHandler::new(questions)
            .handle(UpdateQuestionCommand {
                question_id: created.id,
                title: Some("Nova pergunta?".to_string()),
                options: None,
                answer: None,
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "Nova pergunta?");
        assert_eq!(updated.answer, "ownership");
    }

    #[tokio::test]
    async fn update_question_rejects_single_option_list() {
        let handler = UpdateQuestionHandler::new(Arc::new(InMemoryQuestionRepository::new()));

        let err = handler
            .handle(UpdateQuestionCommand {
                question_id: QuestionId::new(1),
                title: None,
                options: Some(vec!["only".to_string()]),
                answer: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CourseError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn delete_unknown_question_is_not_found() {
        let handler = DeleteQuestionHandler::new(Arc::new(InMemoryQuestionRepository::new()));

        let err = handler.handle(QuestionId::new(3)).await.unwrap_err();

        assert!(matches!(err, CourseError::QuestionNotFound(_)));
    }
}
