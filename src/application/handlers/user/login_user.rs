//! LoginUserHandler / LogoutUserHandler - session lifecycle commands.

use std::sync::Arc;

use crate::domain::user::{Role, User, UserError};
use crate::ports::{CredentialHasher, IdempotencyGuard, TokenService, UserRepository};

/// Command to authenticate with email and password.
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
    pub email: String,
    pub password: String,
    /// Requested role; rejected when it is not a known role name.
    pub role: Option<String>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginUserResult {
    pub user: User,
    pub token: String,
}

/// Handler for logins.
///
/// Lookup and password failures produce the same `InvalidCredentials`
/// error so responses do not reveal which of the two was wrong.
pub struct LoginUserHandler {
    user_repository: Arc<dyn UserRepository>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_service: Arc<dyn TokenService>,
}

impl LoginUserHandler {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_service: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            user_repository,
            credential_hasher,
            token_service,
        }
    }

    pub async fn handle(&self, cmd: LoginUserCommand) -> Result<LoginUserResult, UserError> {
        if let Some(raw) = &cmd.role {
            Role::parse(raw).map_err(|e| UserError::validation("role", e.to_string()))?;
        }

        let user = self
            .user_repository
            .find_by_email(cmd.email.trim())
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .ok_or_else(UserError::invalid_credentials)?;

        let valid = self
            .credential_hasher
            .verify(&cmd.password, &user.password_hash)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        if !valid {
            return Err(UserError::invalid_credentials());
        }

        let token = self
            .token_service
            .issue_session(user.id, user.role)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginUserResult { user, token })
    }
}

/// Command to revoke the current session token.
#[derive(Debug, Clone)]
pub struct LogoutUserCommand {
    pub token: String,
}

/// Handler for logouts.
///
/// Revocation reuses the idempotency guard mechanism: the token is claimed
/// in the revoked-token namespace, whose TTL covers the maximum session
/// lifetime; by the time the guard forgets the claim the token has expired
/// on its own.
pub struct LogoutUserHandler {
    token_service: Arc<dyn TokenService>,
    revoked_tokens: Arc<dyn IdempotencyGuard>,
}

impl LogoutUserHandler {
    pub fn new(
        token_service: Arc<dyn TokenService>,
        revoked_tokens: Arc<dyn IdempotencyGuard>,
    ) -> Self {
        Self {
            token_service,
            revoked_tokens,
        }
    }

    pub async fn handle(&self, cmd: LogoutUserCommand) -> Result<(), UserError> {
        let claims = self
            .token_service
            .validate_session(&cmd.token)
            .map_err(|e| match e {
                crate::ports::AuthError::TokenExpired => UserError::TokenExpired,
                _ => UserError::invalid_credentials(),
            })?;

        // The claim key is the raw token so the auth middleware can check
        // it verbatim.
        self.revoked_tokens
            .claim(&cmd.token)
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        tracing::info!(user_id = %claims.user_id, "Session token revoked");

        Ok(())
    }
}
