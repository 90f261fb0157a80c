//! Command and query handlers for courses and sub-courses.

use std::sync::Arc;

use crate::domain::course::{
    Course, CourseError, CourseTree, CourseUpdate, NewCourse, Price,
};
use crate::domain::foundation::{CourseId, ErrorCode};
use crate::ports::CourseRepository;

/// Input for one course in a create command.
#[derive(Debug, Clone)]
pub struct CourseInput {
    pub title: String,
    pub description: String,
    /// Price in major units as received from the API (e.g. `99.90`).
    pub price: f64,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
}

impl CourseInput {
    fn into_new_course(self) -> Result<NewCourse, CourseError> {
        let price = Price::from_major_units(self.price)
            .map_err(|e| CourseError::validation("price", e.to_string()))?;
        NewCourse::new(
            self.title,
            self.description,
            price,
            self.video_url,
            self.cover_image,
        )
        .map_err(|e| CourseError::validation("title", e.to_string()))
    }
}

/// Handler creating a single course.
pub struct CreateCourseHandler {
    course_repository: Arc<dyn CourseRepository>,
}

impl CreateCourseHandler {
    pub fn new(course_repository: Arc<dyn CourseRepository>) -> Self {
        Self { course_repository }
    }

    pub async fn handle(&self, input: CourseInput) -> Result<Course, CourseError> {
        let new_course = input.into_new_course()?;
        self.course_repository
            .create(new_course)
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))
    }
}

/// Command to create a course with its sub-courses in one step.
#[derive(Debug, Clone)]
pub struct CreateCourseWithSubcoursesCommand {
    pub course: CourseInput,
    pub sub_courses: Vec<CourseInput>,
}

/// Handler creating a parent course and its children atomically.
pub struct CreateCourseWithSubcoursesHandler {
    course_repository: Arc<dyn CourseRepository>,
}

impl CreateCourseWithSubcoursesHandler {
    pub fn new(course_repository: Arc<dyn CourseRepository>) -> Self {
        Self { course_repository }
    }

    pub async fn handle(
        &self,
        cmd: CreateCourseWithSubcoursesCommand,
    ) -> Result<CourseTree, CourseError> {
        let parent = cmd.course.into_new_course()?;
        let children = cmd
            .sub_courses
            .into_iter()
            .map(CourseInput::into_new_course)
            .collect::<Result<Vec<_>, _>>()?;

        self.course_repository
            .create_with_subcourses(parent, children)
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))
    }
}

/// Handler listing all courses with their sub-courses.
pub struct ListCoursesHandler {
    course_repository: Arc<dyn CourseRepository>,
}

impl ListCoursesHandler {
    pub fn new(course_repository: Arc<dyn CourseRepository>) -> Self {
        Self { course_repository }
    }

    pub async fn handle(&self) -> Result<Vec<CourseTree>, CourseError> {
        self.course_repository
            .list()
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))
    }
}

/// Handler resolving one course with its sub-courses.
pub struct GetCourseHandler {
    course_repository: Arc<dyn CourseRepository>,
}

impl GetCourseHandler {
    pub fn new(course_repository: Arc<dyn CourseRepository>) -> Self {
        Self { course_repository }
    }

    pub async fn handle(&self, id: CourseId) -> Result<CourseTree, CourseError> {
        self.course_repository
            .find_tree(id)
            .await
            .map_err(|e| CourseError::infrastructure(e.to_string()))?
            .ok_or_else(|| CourseError::not_found(id))
    }
}

/// Command to update course attributes.
#[derive(Debug, Clone)]
pub struct UpdateCourseCommand {
    pub course_id: CourseId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub video_url: Option<String>,
    pub cover_image: Option<String>,
}

/// Handler applying partial course updates.
pub struct UpdateCourseHandler {
    course_repository: Arc<dyn CourseRepository>,
}

impl UpdateCourseHandler {
    pub fn new(course_repository: Arc<dyn CourseRepository>) -> Self {
        Self { course_repository }
    }

    pub async fn handle(&self, cmd: UpdateCourseCommand) -> Result<Course, CourseError> {
        let price = match cmd.price {
            Some(raw) => Some(
                Price::from_major_units(raw)
                    .map_err(|e| CourseError::validation("price", e.to_string()))?,
            ),
            None => None,
        };

        self.course_repository
            .update(
                cmd.course_id,
                CourseUpdate {
                    title: cmd.title,
                    description: cmd.description,
                    price,
                    video_url: cmd.video_url,
                    cover_image: cmd.cover_image,
                },
            )
            .await
            .map_err(|e| match e.code {
                ErrorCode::CourseNotFound => CourseError::not_found(cmd.course_id),
                _ => CourseError::infrastructure(e.to_string()),
            })
    }
}

/// Handler deleting a course, its sub-courses and questions.
pub struct DeleteCourseHandler {
    course_repository: Arc<dyn CourseRepository>,
}

impl DeleteCourseHandler {
    pub fn new(course_repository: Arc<dyn CourseRepository>) -> Self {
        Self { course_repository }
    }

    pub async fn handle(&self, id: CourseId) -> Result<(), CourseError> {
        self.course_repository.delete(id).await.map_err(|e| match e.code {
            ErrorCode::CourseNotFound => CourseError::not_found(id),
            _ => CourseError::infrastructure(e.to_string()),
        })
    }
}
