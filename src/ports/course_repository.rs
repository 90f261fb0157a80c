//! CourseRepository port - persistence for courses and sub-courses.

use async_trait::async_trait;

use crate::domain::course::{Course, CourseTree, CourseUpdate, NewCourse};
use crate::domain::foundation::{CourseId, DomainError};

/// Port for course persistence.
///
/// The parent/child relation is owned here: deleting a course removes its
/// sub-courses (and, through them, their questions) before the parent row,
/// inside a single transaction.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new top-level course and return it with its assigned id.
    async fn create(&self, course: NewCourse) -> Result<Course, DomainError>;

    /// Insert a course together with its sub-courses in one transaction.
    async fn create_with_subcourses(
        &self,
        course: NewCourse,
        sub_courses: Vec<NewCourse>,
    ) -> Result<CourseTree, DomainError>;

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, DomainError>;

    /// Load a course together with its direct sub-courses.
    async fn find_tree(&self, id: CourseId) -> Result<Option<CourseTree>, DomainError>;

    /// List all top-level courses with their sub-courses.
    async fn list(&self) -> Result<Vec<CourseTree>, DomainError>;

    /// Apply a partial update, returning the updated course.
    ///
    /// Fails with `CourseNotFound` if the id does not resolve.
    async fn update(&self, id: CourseId, update: CourseUpdate) -> Result<Course, DomainError>;

    /// Delete a course, its sub-courses and their questions.
    ///
    /// Fails with `CourseNotFound` if the id does not resolve.
    async fn delete(&self, id: CourseId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CourseRepository) {}
    }
}
