//! Quiz questions attached to a course.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, QuestionId, Timestamp, ValidationError};

/// A multiple-choice question owned by exactly one course.
///
/// Questions are deleted together with the owning course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub course_id: CourseId,
    pub title: String,
    pub options: Vec<String>,
    pub answer: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A question about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub course_id: CourseId,
    pub title: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl NewQuestion {
    pub fn new(
        course_id: CourseId,
        title: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let answer = answer.into();

        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if options.len() < 2 {
            return Err(ValidationError::invalid_format(
                "options",
                "a question needs at least two options",
            ));
        }
        if answer.trim().is_empty() {
            return Err(ValidationError::empty_field("answer"));
        }

        Ok(Self {
            course_id,
            title,
            options,
            answer,
        })
    }
}

/// Partial update of question attributes.
#[derive(Debug, Clone, Default)]
pub struct QuestionUpdate {
    pub title: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
}

impl Question {
    /// Applies a partial update in place.
    pub fn apply_update(&mut self, update: QuestionUpdate, now: Timestamp) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(options) = update.options {
            self.options = options;
        }
        if let Some(answer) = update.answer {
            self.answer = answer;
        }
        self.updated_at = now;
    }
}
