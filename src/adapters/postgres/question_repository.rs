//! PostgreSQL implementation of QuestionRepository.
//!
//! Options are stored as a `text[]` column; ordering is the array order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::course::{NewQuestion, Question, QuestionUpdate};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, QuestionId, Timestamp};
use crate::ports::QuestionRepository;

/// PostgreSQL implementation of the QuestionRepository port.
pub struct PostgresQuestionRepository {
    pool: PgPool,
}

impl PostgresQuestionRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a question.
#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: i64,
    course_id: i64,
    title: String,
    options: Vec<String>,
    answer: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: QuestionId::new(row.id),
            course_id: CourseId::new(row.course_id),
            title: row.title,
            options: row.options,
            answer: row.answer,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

const QUESTION_COLUMNS: &str = "id, course_id, title, options, answer, created_at, updated_at";

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn create(&self, question: NewQuestion) -> Result<Question, DomainError> {
        let row: QuestionRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO questions (course_id, title, options, answer)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(question.course_id.as_i64())
        .bind(&question.title)
        .bind(&question.options)
        .bind(&question.answer)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("questions_course_id_fkey") {
                    return DomainError::new(ErrorCode::CourseNotFound, "Course not found");
                }
            }
            db_error("Failed to save question", e)
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, DomainError> {
        let row: Option<QuestionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM questions WHERE id = $1",
            QUESTION_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find question", e))?;

        Ok(row.map(Question::from))
    }

    async fn list_for_course(&self, course_id: CourseId) -> Result<Vec<Question>, DomainError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM questions WHERE course_id = $1 ORDER BY id",
            QUESTION_COLUMNS
        ))
        .bind(course_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list questions", e))?;

        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn update(
        &self,
        id: QuestionId,
        update: QuestionUpdate,
    ) -> Result<Question, DomainError> {
        let row: Option<QuestionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE questions SET
                title = COALESCE($2, title),
                options = COALESCE($3, options),
                answer = COALESCE($4, answer),
                updated_at = now()
            WHERE id = $1
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(id.as_i64())
        .bind(&update.title)
        .bind(&update.options)
        .bind(&update.answer)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update question", e))?;

        row.map(Question::from)
            .ok_or_else(|| DomainError::new(ErrorCode::QuestionNotFound, "Question not found"))
    }

    async fn delete(&self, id: QuestionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete question", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::QuestionNotFound,
                "Question not found",
            ));
        }

        Ok(())
    }
}
