//! Axum router configuration for course and question endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    add_question, create_course, create_course_with_subcourses, delete_course, delete_question,
    get_course, list_courses, list_questions, update_course, update_question, CourseAppState,
};

/// Create the course API router, mounted at `/api/courses`.
///
/// # Routes
///
/// ## Public
/// - `GET /` - List courses with their sub-courses
/// - `GET /:id` - Get one course with its sub-courses
/// - `GET /:id/questions` - List a course's questions
///
/// ## Authenticated
/// - `POST /` - Create a course
/// - `POST /with-subcourses` - Create a course and its sub-courses
/// - `PUT /:id` - Update a course
/// - `DELETE /:id` - Delete a course, its sub-courses and questions
/// - `POST /:id/questions` - Add a question
pub fn course_routes() -> Router<CourseAppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/with-subcourses", post(create_course_with_subcourses))
        .route(
            "/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/:id/questions", get(list_questions).post(add_question))
}

/// Create the question API router, mounted at `/api/questions`.
///
/// # Routes (authenticated)
/// - `PUT /:id` - Update a question
/// - `DELETE /:id` - Delete a question
pub fn question_routes() -> Router<CourseAppState> {
    Router::new().route("/:id", put(update_question).delete(delete_question))
}
