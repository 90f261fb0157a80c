//! Course handlers: course CRUD, sub-course creation and quiz questions.

mod manage_courses;
mod manage_questions;

#[cfg(test)]
pub mod test_support;

pub use manage_courses::{
    CourseInput, CreateCourseHandler, CreateCourseWithSubcoursesCommand,
    CreateCourseWithSubcoursesHandler, DeleteCourseHandler, GetCourseHandler, ListCoursesHandler,
    UpdateCourseCommand, UpdateCourseHandler,
};
pub use manage_questions::{
    AddQuestionCommand, AddQuestionHandler, DeleteQuestionHandler, ListQuestionsHandler,
    UpdateQuestionCommand, UpdateQuestionHandler,
};
