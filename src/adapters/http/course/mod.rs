//! Course HTTP module.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{CourseApiError, CourseAppState};
pub use routes::{course_routes, question_routes};
