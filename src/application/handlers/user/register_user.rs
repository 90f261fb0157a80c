//! RegisterUserHandler - Command handler for account registration.

use std::sync::Arc;

use crate::domain::user::{validate_password, Cpf, NewUser, Role, User, UserError};
use crate::ports::{CredentialHasher, TokenService, UserRepository};

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role name; defaults to STUDENT when absent.
    pub role: Option<String>,
    pub cpf: String,
    pub profession: Option<String>,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterUserResult {
    pub user: User,
    /// Session token so the client is logged in immediately.
    pub token: String,
}

/// Handler for account registration.
///
/// Validates role, password policy and CPF format, rejects duplicate CPF
/// and email, then stores the Argon2id hash and issues a session token.
pub struct RegisterUserHandler {
    user_repository: Arc<dyn UserRepository>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_service: Arc<dyn TokenService>,
}

impl RegisterUserHandler {
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

    pub async fn handle(&self, cmd: RegisterUserCommand) -> Result<RegisterUserResult, UserError> {
        let role = match &cmd.role {
            Some(raw) => Role::parse(raw).map_err(|e| UserError::validation("role", e.to_string()))?,
            None => Role::default(),
        };

        validate_password(&cmd.password)
            .map_err(|e| UserError::validation("password", e.to_string()))?;

        let cpf = Cpf::new(cmd.cpf).map_err(|e| UserError::validation("cpf", e.to_string()))?;

        // Uniqueness pre-checks give friendly errors; the store's unique
        // constraints remain the actual guarantee under concurrency.
        if self
            .user_repository
            .find_by_cpf(cpf.as_str())
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .is_some()
        {
            return Err(UserError::duplicate_cpf(cpf.as_str()));
        }

        if self
            .user_repository
            .find_by_email(cmd.email.trim())
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .is_some()
        {
            return Err(UserError::duplicate_email(cmd.email));
        }

        let password_hash = self
            .credential_hasher
            .hash(&cmd.password)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        let new_user = NewUser::registration(
            cmd.name,
            cmd.email,
            password_hash,
            role,
            cpf,
            cmd.profession,
        )
        .map_err(UserError::from_validation)?;

        let user = self.user_repository.create(new_user).await?;

        let token = self
            .token_service
            .issue_session(user.id, user.role)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(RegisterUserResult { user, token })
    }
}
