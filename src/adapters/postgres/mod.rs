//! PostgreSQL adapters for the repository and store ports.

mod course_repository;
mod entitlement_store;
mod question_repository;
mod user_repository;

pub use course_repository::PostgresCourseRepository;
pub use entitlement_store::PostgresEntitlementStore;
pub use question_repository::PostgresQuestionRepository;
pub use user_repository::PostgresUserRepository;
