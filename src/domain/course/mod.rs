//! Course domain: courses, sub-courses and quiz questions.

mod aggregate;
mod errors;
mod price;
mod question;

pub use aggregate::{Course, CourseTree, CourseUpdate, NewCourse};
pub use errors::CourseError;
pub use price::Price;
pub use question::{NewQuestion, Question, QuestionUpdate};
