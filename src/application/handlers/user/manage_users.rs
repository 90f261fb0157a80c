//! Query and maintenance handlers for user accounts.

use std::sync::Arc;

use crate::domain::enrollment::Entitlement;
use crate::domain::foundation::UserId;
use crate::domain::user::{Cpf, User, UserError, UserUpdate};
use crate::ports::{EntitlementStore, UserRepository};

/// Handler listing every registered user.
pub struct ListUsersHandler {
    user_repository: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self) -> Result<Vec<User>, UserError> {
        self.user_repository
            .list()
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))
    }
}

/// Query for one user and their purchase records.
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub user_id: UserId,
}

/// A user together with their entitlements.
#[derive(Debug, Clone)]
pub struct UserWithEntitlements {
    pub user: User,
    pub entitlements: Vec<Entitlement>,
}

/// Handler resolving a user plus the courses they may access.
pub struct GetUserHandler {
    user_repository: Arc<dyn UserRepository>,
    entitlement_store: Arc<dyn EntitlementStore>,
}

impl GetUserHandler {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        entitlement_store: Arc<dyn EntitlementStore>,
    ) -> Self {
        Self {
            user_repository,
            entitlement_store,
        }
    }

    pub async fn handle(&self, query: GetUserQuery) -> Result<UserWithEntitlements, UserError> {
        let user = self
            .user_repository
            .find_by_id(query.user_id)
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .ok_or_else(|| UserError::not_found(query.user_id))?;

        let entitlements = self
            .entitlement_store
            .list_for_user(user.id)
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        Ok(UserWithEntitlements { user, entitlements })
    }
}

/// Command to update profile attributes.
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub state: Option<String>,
    pub about: Option<String>,
    pub cpf: Option<String>,
    pub profession: Option<String>,
}

/// Handler applying partial profile updates.
pub struct UpdateUserHandler {
    user_repository: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self, cmd: UpdateUserCommand) -> Result<User, UserError> {
        let mut user = self
            .user_repository
            .find_by_id(cmd.user_id)
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .ok_or_else(|| UserError::not_found(cmd.user_id))?;

        let cpf = match cmd.cpf {
            Some(raw) => {
                Some(Cpf::new(raw).map_err(|e| UserError::validation("cpf", e.to_string()))?)
            }
            None => None,
        };

        if let Some(email) = &cmd.email {
            if !email.contains('@') {
                return Err(UserError::validation("email", "missing @ symbol"));
            }
        }

        user.apply_update(
            UserUpdate {
                name: cmd.name,
                email: cmd.email,
                state: cmd.state,
                about: cmd.about,
                cpf,
                profession: cmd.profession,
            },
            crate::domain::foundation::Timestamp::now(),
        );

        self.user_repository.update(&user).await?;

        Ok(user)
    }
}

/// Handler deleting a user account.
pub struct DeleteUserHandler {
    user_repository: Arc<dyn UserRepository>,
}

impl DeleteUserHandler {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<(), UserError> {
        self.user_repository.delete(user_id).await.map_err(|e| {
            if e.code == crate::domain::foundation::ErrorCode::UserNotFound {
                UserError::not_found(user_id)
            } else {
                UserError::infrastructure(e.to_string())
            }
        })
    }
}

/// Command to set or clear a profile picture URL.
#[derive(Debug, Clone)]
pub struct SetProfilePictureCommand {
    pub user_id: UserId,
    /// `None` removes the picture.
    pub profile_picture: Option<String>,
}

/// Handler updating the stored profile picture URL.
///
/// The file itself lives in external storage; only the reference is kept
/// here.
pub struct SetProfilePictureHandler {
    user_repository: Arc<dyn UserRepository>,
}

impl SetProfilePictureHandler {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn handle(&self, cmd: SetProfilePictureCommand) -> Result<User, UserError> {
        if let Some(url) = &cmd.profile_picture {
            if url.trim().is_empty() {
                return Err(UserError::validation(
                    "profile_picture",
                    "cannot be empty",
                ));
            }
        }

        self.user_repository
            .update_profile_picture(cmd.user_id, cmd.profile_picture)
            .await
            .map_err(|e| {
                if e.code == crate::domain::foundation::ErrorCode::UserNotFound {
                    UserError::not_found(cmd.user_id)
                } else {
                    UserError::infrastructure(e.to_string())
                }
            })
    }
}
