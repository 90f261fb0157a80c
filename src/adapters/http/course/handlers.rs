//! HTTP handlers for course and question endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::course::{
    AddQuestionCommand, AddQuestionHandler, CourseInput, CreateCourseHandler,
    CreateCourseWithSubcoursesCommand, CreateCourseWithSubcoursesHandler, DeleteCourseHandler,
    DeleteQuestionHandler, GetCourseHandler, ListCoursesHandler, ListQuestionsHandler,
    UpdateCourseCommand, UpdateCourseHandler, UpdateQuestionCommand, UpdateQuestionHandler,
};
use crate::domain::course::CourseError;
use crate::domain::foundation::{CourseId, QuestionId};
use crate::ports::{CourseRepository, QuestionRepository};

use super::dto::{
    CourseRequest, CourseResponse, CourseTreeResponse, CreateCourseWithSubcoursesRequest,
    QuestionRequest, QuestionResponse, UpdateCourseRequest, UpdateQuestionRequest,
};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the course module, cloned per request.
#[derive(Clone)]
pub struct CourseAppState {
    pub course_repository: Arc<dyn CourseRepository>,
    pub question_repository: Arc<dyn QuestionRepository>,
}

impl CourseAppState {
    pub fn create_handler(&self) -> CreateCourseHandler {
        CreateCourseHandler::new(self.course_repository.clone())
    }

    pub fn create_with_subcourses_handler(&self) -> CreateCourseWithSubcoursesHandler {
        CreateCourseWithSubcoursesHandler::new(self.course_repository.clone())
    }

    pub fn list_handler(&self) -> ListCoursesHandler {
        ListCoursesHandler::new(self.course_repository.clone())
    }

    pub fn get_handler(&self) -> GetCourseHandler {
        GetCourseHandler::new(self.course_repository.clone())
    }

    pub fn update_handler(&self) -> UpdateCourseHandler {
        UpdateCourseHandler::new(self.course_repository.clone())
    }

    pub fn delete_handler(&self) -> DeleteCourseHandler {
        DeleteCourseHandler::new(self.course_repository.clone())
    }

    pub fn add_question_handler(&self) -> AddQuestionHandler {
        AddQuestionHandler::new(
            self.course_repository.clone(),
            self.question_repository.clone(),
        )
    }

    pub fn list_questions_handler(&self) -> ListQuestionsHandler {
        ListQuestionsHandler::new(
            self.course_repository.clone(),
            self.question_repository.clone(),
        )
    }

    pub fn update_question_handler(&self) -> UpdateQuestionHandler {
        UpdateQuestionHandler::new(self.question_repository.clone())
    }

    pub fn delete_question_handler(&self) -> DeleteQuestionHandler {
        DeleteQuestionHandler::new(self.question_repository.clone())
    }
}

fn course_input(request: CourseRequest) -> CourseInput {
    CourseInput {
        title: request.title,
        description: request.description,
        price: request.price,
        video_url: request.video_url,
        cover_image: request.cover_image,
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Course Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/courses
pub async fn create_course(
    State(state): State<CourseAppState>,
    _auth: RequireAuth,
    Json(request): Json<CourseRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let course = state.create_handler().handle(course_input(request)).await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

/// POST /api/courses/with-subcourses
pub async fn create_course_with_subcourses(
    State(state): State<CourseAppState>,
    _auth: RequireAuth,
    Json(request): Json<CreateCourseWithSubcoursesRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let tree = state
        .create_with_subcourses_handler()
        .handle(CreateCourseWithSubcoursesCommand {
            course: course_input(request.course),
            sub_courses: request.sub_courses.into_iter().map(course_input).collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CourseTreeResponse::from(tree))))
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<CourseAppState>,
) -> Result<impl IntoResponse, CourseApiError> {
    let trees = state.list_handler().handle().await?;

    let response: Vec<CourseTreeResponse> =
        trees.into_iter().map(CourseTreeResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/courses/:id
pub async fn get_course(
    State(state): State<CourseAppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CourseApiError> {
    let tree = state.get_handler().handle(CourseId::new(id)).await?;

    Ok(Json(CourseTreeResponse::from(tree)))
}

/// PUT /api/courses/:id
pub async fn update_course(
    State(state): State<CourseAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let course = state
        .update_handler()
        .handle(UpdateCourseCommand {
            course_id: CourseId::new(id),
            title: request.title,
            description: request.description,
            price: request.price,
            video_url: request.video_url,
            cover_image: request.cover_image,
        })
        .await?;

    Ok(Json(CourseResponse::from(course)))
}

/// DELETE /api/courses/:id
pub async fn delete_course(
    State(state): State<CourseAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CourseApiError> {
    state.delete_handler().handle(CourseId::new(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Question Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/courses/:id/questions
pub async fn add_question(
    State(state): State<CourseAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<QuestionRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let question = state
        .add_question_handler()
        .handle(AddQuestionCommand {
            course_id: CourseId::new(id),
            title: request.title,
            options: request.options,
            answer: request.answer,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from(question))))
}

/// GET /api/courses/:id/questions
pub async fn list_questions(
    State(state): State<CourseAppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CourseApiError> {
    let questions = state
        .list_questions_handler()
        .handle(CourseId::new(id))
        .await?;

    let response: Vec<QuestionResponse> =
        questions.into_iter().map(QuestionResponse::from).collect();
    Ok(Json(response))
}

/// PUT /api/questions/:id
pub async fn update_question(
    State(state): State<CourseAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, CourseApiError> {
    let question = state
        .update_question_handler()
        .handle(UpdateQuestionCommand {
            question_id: QuestionId::new(id),
            title: request.title,
            options: request.options,
            answer: request.answer,
        })
        .await?;

    Ok(Json(QuestionResponse::from(question)))
}

/// DELETE /api/questions/:id
pub async fn delete_question(
    State(state): State<CourseAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CourseApiError> {
    state
        .delete_question_handler()
        .handle(QuestionId::new(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type converting course errors to HTTP responses.
pub struct CourseApiError(CourseError);

impl From<CourseError> for CourseApiError {
    fn from(err: CourseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CourseApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            CourseError::NotFound(_) | CourseError::QuestionNotFound(_) => StatusCode::NOT_FOUND,
            CourseError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            CourseError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_errors_map_to_expected_status_codes() {
        let cases = [
            (
                CourseError::not_found(CourseId::new(1)),
                StatusCode::NOT_FOUND,
            ),
            (
                CourseError::question_not_found(QuestionId::new(1)),
                StatusCode::NOT_FOUND,
            ),
            (
                CourseError::validation("price", "negative"),
                StatusCode::BAD_REQUEST,
            ),
            (
                CourseError::infrastructure("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = CourseApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
