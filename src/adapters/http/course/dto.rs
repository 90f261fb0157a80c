//! Request/response DTOs for course endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::course::{Course, CourseTree, Question};

/// Course fields accepted on creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseRequest {
    pub title: String,
    pub description: String,
    /// Price in major units, e.g. `99.90`.
    pub price: f64,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
}

/// POST /api/courses/with-subcourses request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseWithSubcoursesRequest {
    #[serde(flatten)]
    pub course: CourseRequest,
    pub sub_courses: Vec<CourseRequest>,
}

/// PUT /api/courses/:id request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
}

/// Course representation in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
    pub parent_course_id: Option<i64>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id.as_i64(),
            title: course.title,
            description: course.description,
            price: course.price.as_major_units(),
            video_url: course.video_url,
            cover_image: course.cover_image,
            parent_course_id: course.parent_course_id.map(|id| id.as_i64()),
        }
    }
}

/// Course with sub-courses in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseTreeResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub sub_courses: Vec<CourseResponse>,
}

impl From<CourseTree> for CourseTreeResponse {
    fn from(tree: CourseTree) -> Self {
        Self {
            course: CourseResponse::from(tree.course),
            sub_courses: tree
                .sub_courses
                .into_iter()
                .map(CourseResponse::from)
                .collect(),
        }
    }
}

/// POST /api/courses/:id/questions request.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub title: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// PUT /api/questions/:id request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuestionRequest {
    pub title: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
}

/// Question representation in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.as_i64(),
            course_id: question.course_id.as_i64(),
            title: question.title,
            options: question.options,
            answer: question.answer,
        }
    }
}
