//! Administrative grant/revoke of course access and access queries.
//!
//! These handlers share the Entitlement Store with the webhook-driven
//! unlock, so the at-most-one-approved-record invariant holds regardless of
//! which path performed the grant.

use std::sync::Arc;

use crate::domain::enrollment::{Entitlement, EnrollmentError};
use crate::domain::foundation::{CourseId, ErrorCode, UserId};
use crate::ports::{CourseRepository, EntitlementStore, UserRepository};

/// Command to grant course access directly (bypassing payment).
#[derive(Debug, Clone)]
pub struct GrantCourseCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Handler for administrative grants.
pub struct GrantCourseHandler {
    user_repository: Arc<dyn UserRepository>,
    course_repository: Arc<dyn CourseRepository>,
    entitlement_store: Arc<dyn EntitlementStore>,
}

impl GrantCourseHandler {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        course_repository: Arc<dyn CourseRepository>,
        entitlement_store: Arc<dyn EntitlementStore>,
    ) -> Self {
        Self {
            user_repository,
            course_repository,
            entitlement_store,
        }
    }

    pub async fn handle(&self, cmd: GrantCourseCommand) -> Result<Entitlement, EnrollmentError> {
        if self
            .course_repository
            .find_by_id(cmd.course_id)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))?
            .is_none()
        {
            return Err(EnrollmentError::course_not_found(cmd.course_id));
        }

        if self
            .user_repository
            .find_by_id(cmd.user_id)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))?
            .is_none()
        {
            return Err(EnrollmentError::user_not_found(cmd.user_id));
        }

        self.entitlement_store
            .grant(cmd.user_id, cmd.course_id, None)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))
    }
}

/// Command to revoke course access.
#[derive(Debug, Clone)]
pub struct RevokeCourseCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Handler for administrative revocations.
pub struct RevokeCourseHandler {
    entitlement_store: Arc<dyn EntitlementStore>,
}

impl RevokeCourseHandler {
    pub fn new(entitlement_store: Arc<dyn EntitlementStore>) -> Self {
        Self { entitlement_store }
    }

    pub async fn handle(&self, cmd: RevokeCourseCommand) -> Result<(), EnrollmentError> {
        self.entitlement_store
            .revoke(cmd.user_id, cmd.course_id)
            .await
            .map_err(|e| match e.code {
                ErrorCode::EntitlementNotFound => {
                    EnrollmentError::not_enrolled(cmd.user_id, cmd.course_id)
                }
                _ => EnrollmentError::infrastructure(e.to_string()),
            })
    }
}

/// Query whether a user currently has access to a course.
#[derive(Debug, Clone)]
pub struct CheckAccessQuery {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Handler answering access queries.
pub struct CheckAccessHandler {
    entitlement_store: Arc<dyn EntitlementStore>,
}

impl CheckAccessHandler {
    pub fn new(entitlement_store: Arc<dyn EntitlementStore>) -> Self {
        Self { entitlement_store }
    }

    pub async fn handle(&self, query: CheckAccessQuery) -> Result<bool, EnrollmentError> {
        self.entitlement_store
            .has(query.user_id, query.course_id)
            .await
            .map_err(|e| EnrollmentError::infrastructure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::enrollment::test_support::{
        InMemoryEntitlementStore, MockCourseRepository, MockUserRepository,
    };
    use crate::domain::course::Price;

    fn grant_handler(store: Arc<InMemoryEntitlementStore>) -> GrantCourseHandler {
        GrantCourseHandler::new(
            Arc::new(MockUserRepository::with_user(7)),
            Arc::new(MockCourseRepository::with_course(
                1,
                Price::from_cents(9990).unwrap(),
            )),
            store,
        )
    }

    #[tokio::test]
    async fn grant_twice_returns_same_entitlement_without_error() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let handler = grant_handler(store.clone());
        let cmd = GrantCourseCommand {
            user_id: UserId::new(7),
            course_id: CourseId::new(1),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert!(first.is_approved());
        assert!(second.is_approved());
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(first.course_id, second.course_id);
        assert_eq!(store.approved_count(), 1);
    }

    #[tokio::test]
    async fn grant_rejects_missing_course_and_user() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let handler = grant_handler(store.clone());

        let err = handler
            .handle(GrantCourseCommand {
                user_id: UserId::new(7),
                course_id: CourseId::new(404),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::CourseNotFound(_)));

        let err = handler
            .handle(GrantCourseCommand {
                user_id: UserId::new(404),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::UserNotFound(_)));

        assert_eq!(store.approved_count(), 0);
    }

    #[tokio::test]
    async fn concurrent_grants_converge_to_one_association() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let handler = Arc::new(grant_handler(store.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move {
                    handler
                        .handle(GrantCourseCommand {
                            user_id: UserId::new(7),
                            course_id: CourseId::new(1),
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.approved_count(), 1);
    }

    #[tokio::test]
    async fn revoke_removes_access_and_missing_pair_is_not_found() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        store
            .grant(UserId::new(7), CourseId::new(1), None)
            .await
            .unwrap();

        let revoke = RevokeCourseHandler::new(store.clone());
        revoke
            .handle(RevokeCourseCommand {
                user_id: UserId::new(7),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap();

        let check = CheckAccessHandler::new(store.clone());
        assert!(!check
            .handle(CheckAccessQuery {
                user_id: UserId::new(7),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap());

        let err = revoke
            .handle(RevokeCourseCommand {
                user_id: UserId::new(7),
                course_id: CourseId::new(1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrollmentError::NotEnrolled { .. }));
    }

    #[tokio::test]
    async fn check_access_reflects_grant() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let check = CheckAccessHandler::new(store.clone());
        let query = CheckAccessQuery {
            user_id: UserId::new(7),
            course_id: CourseId::new(1),
        };

        assert!(!check.handle(query.clone()).await.unwrap());

        store
            .grant(UserId::new(7), CourseId::new(1), None)
            .await
            .unwrap();

        assert!(check.handle(query).await.unwrap());
    }
}
