//! UserRepository port - persistence for user accounts.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{NewUser, User};

/// Port for user account persistence.
///
/// Uniqueness of email and CPF is enforced by the store; duplicate inserts
/// surface as `DuplicateUser` domain errors rather than raw database
/// failures.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its assigned id.
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, DomainError>;

    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Persist the mutable attributes of an existing user.
    ///
    /// Fails with `UserNotFound` if the id no longer resolves.
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Replace the stored credential hash.
    async fn update_password_hash(&self, id: UserId, password_hash: &str)
        -> Result<(), DomainError>;

    /// Set or clear the profile picture URL, returning the updated user.
    async fn update_profile_picture(
        &self,
        id: UserId,
        profile_picture: Option<String>,
    ) -> Result<User, DomainError>;

    async fn delete(&self, id: UserId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn UserRepository) {}
    }
}
