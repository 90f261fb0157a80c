//! ChangePasswordHandler - Command handler for in-session password changes.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::user::{validate_password, UserError};
use crate::ports::{CredentialHasher, UserRepository};

/// Command to change a password given the current one.
#[derive(Debug, Clone)]
pub struct ChangePasswordCommand {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

/// Handler for password changes.
pub struct ChangePasswordHandler {
    user_repository: Arc<dyn UserRepository>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl ChangePasswordHandler {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        credential_hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            user_repository,
            credential_hasher,
        }
    }

    pub async fn handle(&self, cmd: ChangePasswordCommand) -> Result<(), UserError> {
        let user = self
            .user_repository
            .find_by_id(cmd.user_id)
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .ok_or_else(|| UserError::not_found(cmd.user_id))?;

        let current_valid = self
            .credential_hasher
            .verify(&cmd.current_password, &user.password_hash)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;
        if !current_valid {
            return Err(UserError::validation(
                "current_password",
                "current password is incorrect",
            ));
        }

        validate_password(&cmd.new_password)
            .map_err(|e| UserError::validation("new_password", e.to_string()))?;

        // Reusing the current password is rejected.
        let same_as_current = self
            .credential_hasher
            .verify(&cmd.new_password, &user.password_hash)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;
        if same_as_current {
            return Err(UserError::validation(
                "new_password",
                "new password must differ from the current one",
            ));
        }

        let new_hash = self
            .credential_hasher
            .hash(&cmd.new_password)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        self.user_repository
            .update_password_hash(cmd.user_id, &new_hash)
            .await?;

        tracing::info!(user_id = %cmd.user_id, "Password changed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::enrollment::test_support::MockUserRepository;
    use crate::application::handlers::user::test_support::MockHasher;

    fn handler(repo: Arc<MockUserRepository>) -> ChangePasswordHandler {
        ChangePasswordHandler::new(repo, Arc::new(MockHasher))
    }

    // test_user(7) carries the stub hash "$argon2id$stub", which MockHasher
    // will never verify, so each test seeds a known password first.
    fn repo_with_user() -> Arc<MockUserRepository> {
        Arc::new(MockUserRepository::with_user(7))
    }

    async fn set_password(repo: &MockUserRepository, password: &str) {
        repo.update_password_hash(UserId::new(7), &format!("hashed:{}", password))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn change_password_replaces_hash() {
        let repo = repo_with_user();
        set_password(&repo, "OldSecret1!").await;

        handler(repo.clone())
            .handle(ChangePasswordCommand {
                user_id: UserId::new(7),
                current_password: "OldSecret1!".to_string(),
                new_password: "NewSecret2@".to_string(),
            })
            .await
            .unwrap();

        let user = repo.find_by_id(UserId::new(7)).await.unwrap().unwrap();
        assert_eq!(user.password_hash, "hashed:NewSecret2@");
    }

    #[tokio::test]
    async fn change_password_rejects_wrong_current_password() {
        let repo = repo_with_user();
        set_password(&repo, "OldSecret1!").await;

        let err = handler(repo)
            .handle(ChangePasswordCommand {
                user_id: UserId::new(7),
                current_password: "WrongOld1!".to_string(),
                new_password: "NewSecret2@".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UserError::ValidationFailed { ref field, .. } if field == "current_password"
        ));
    }

    #[tokio::test]
    async fn change_password_rejects_weak_new_password() {
        let repo = repo_with_user();
        set_password(&repo, "OldSecret1!").await;

        let err = handler(repo)
            .handle(ChangePasswordCommand {
                user_id: UserId::new(7),
                current_password: "OldSecret1!".to_string(),
                new_password: "weak".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UserError::ValidationFailed { ref field, .. } if field == "new_password"
        ));
    }

    #[tokio::test]
    async fn change_password_rejects_reusing_current_password() {
        let repo = repo_with_user();
        set_password(&repo, "OldSecret1!").await;

        let err = handler(repo)
            .handle(ChangePasswordCommand {
                user_id: UserId::new(7),
                current_password: "OldSecret1!".to_string(),
                new_password: "OldSecret1!".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            UserError::ValidationFailed { ref field, .. } if field == "new_password"
        ));
    }

    #[tokio::test]
    async fn change_password_for_unknown_user_is_not_found() {
        let err = handler(Arc::new(MockUserRepository::empty()))
            .handle(ChangePasswordCommand {
                user_id: UserId::new(99),
                current_password: "OldSecret1!".to_string(),
                new_password: "NewSecret2@".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound(_)));
    }
}
