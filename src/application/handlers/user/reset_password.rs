//! ForgotPasswordHandler / ResetPasswordHandler - email-based password reset.

use std::sync::Arc;

use crate::domain::user::{validate_password, UserError};
use crate::ports::{CredentialHasher, EmailMessage, Mailer, TokenService, UserRepository};

/// Command to request a password-reset email.
#[derive(Debug, Clone)]
pub struct ForgotPasswordCommand {
    pub email: String,
}

/// Handler for password-reset requests.
///
/// Issues a short-lived reset token and emails a reset link. The mailer is
/// an opaque collaborator: its failure is reported, but the token issued
/// remains valid.
pub struct ForgotPasswordHandler {
    user_repository: Arc<dyn UserRepository>,
    token_service: Arc<dyn TokenService>,
    mailer: Arc<dyn Mailer>,
    /// Client-side page the reset link points at.
    reset_url: String,
}

impl ForgotPasswordHandler {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_service: Arc<dyn TokenService>,
        mailer: Arc<dyn Mailer>,
        reset_url: impl Into<String>,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            mailer,
            reset_url: reset_url.into(),
        }
    }

    pub async fn handle(&self, cmd: ForgotPasswordCommand) -> Result<(), UserError> {
        let user = self
            .user_repository
            .find_by_email(cmd.email.trim())
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .ok_or_else(|| UserError::not_found_by_email(cmd.email.clone()))?;

        let token = self
            .token_service
            .issue_reset(user.id)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        let link = format!("{}?token={}", self.reset_url, token);
        let message = EmailMessage {
            to: user.email.clone(),
            subject: "Redefinição de senha".to_string(),
            text: format!(
                "Olá, {},\n\n\
                 Recebemos uma solicitação para redefinir a sua senha. \
                 Para continuar, acesse o link abaixo:\n\n{}\n\n\
                 Este link é válido por 1 hora. Caso você não tenha \
                 solicitado a alteração, desconsidere este e-mail.",
                user.name, link
            ),
        };

        self.mailer.send(message).await.map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Reset email delivery failed");
            UserError::infrastructure(e.to_string())
        })?;

        tracing::info!(user_id = %user.id, "Password reset email sent");

        Ok(())
    }
}

/// Command to set a new password using a reset token.
#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub token: String,
    pub password: String,
}

/// Handler for completing a password reset.
pub struct ResetPasswordHandler {
    user_repository: Arc<dyn UserRepository>,
    token_service: Arc<dyn TokenService>,
    credential_hasher: Arc<dyn CredentialHasher>,
}

impl ResetPasswordHandler {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_service: Arc<dyn TokenService>,
        credential_hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            credential_hasher,
        }
    }

    pub async fn handle(&self, cmd: ResetPasswordCommand) -> Result<(), UserError> {
        let user_id = self
            .token_service
            .validate_reset(&cmd.token)
            .map_err(|e| match e {
                crate::ports::AuthError::TokenExpired => UserError::TokenExpired,
                _ => UserError::validation("token", "reset token is invalid"),
            })?;

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await
            .map_err(|e| UserError::infrastructure(e.to_string()))?
            .ok_or_else(|| UserError::not_found(user_id))?;

        validate_password(&cmd.password)
            .map_err(|e| UserError::validation("password", e.to_string()))?;

        let hash = self
            .credential_hasher
            .hash(&cmd.password)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        self.user_repository
            .update_password_hash(user.id, &hash)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset completed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::enrollment::test_support::MockUserRepository;
    use crate::application::handlers::user::test_support::{
        MockHasher, MockTokenService, RecordingMailer,
    };
    use crate::domain::foundation::UserId;
    use crate::ports::UserRepository as _;

    #[tokio::test]
    async fn forgot_password_emails_a_reset_link() {
        let mailer = Arc::new(RecordingMailer::new());
        let handler = ForgotPasswordHandler::new(
            Arc::new(MockUserRepository::with_user(7)),
            Arc::new(MockTokenService),
            mailer.clone(),
            "https://app.example.com/reset-password",
        );

        handler
            .handle(ForgotPasswordCommand {
                email: "user7@example.com".to_string(),
            })
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user7@example.com");
        assert!(sent[0]
            .text
            .contains("https://app.example.com/reset-password?token=reset:7"));
    }

    #[tokio::test]
    async fn forgot_password_for_unknown_email_is_not_found() {
        let handler = ForgotPasswordHandler::new(
            Arc::new(MockUserRepository::empty()),
            Arc::new(MockTokenService),
            Arc::new(RecordingMailer::new()),
            "https://app.example.com/reset-password",
        );

        let err = handler
            .handle(ForgotPasswordCommand {
                email: "nobody@example.com".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFoundByEmail(_)));
    }

    #[tokio::test]
    async fn reset_password_updates_the_hash() {
        let repo = Arc::new(MockUserRepository::with_user(7));
        let handler = ResetPasswordHandler::new(
            repo.clone(),
            Arc::new(MockTokenService),
            Arc::new(MockHasher),
        );

        handler
            .handle(ResetPasswordCommand {
                token: "reset:7".to_string(),
                password: "NewSecret2@".to_string(),
            })
            .await
            .unwrap();

        let user = repo.find_by_id(UserId::new(7)).await.unwrap().unwrap();
        assert_eq!(user.password_hash, "hashed:NewSecret2@");
    }

    #[tokio::test]
    async fn reset_password_rejects_invalid_token() {
        let handler = ResetPasswordHandler::new(
            Arc::new(MockUserRepository::with_user(7)),
            Arc::new(MockTokenService),
            Arc::new(MockHasher),
        );

        let err = handler
            .handle(ResetPasswordCommand {
                token: "bogus".to_string(),
                password: "NewSecret2@".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn reset_password_enforces_the_policy() {
        let handler = ResetPasswordHandler::new(
            Arc::new(MockUserRepository::with_user(7)),
            Arc::new(MockTokenService),
            Arc::new(MockHasher),
        );

        let err = handler
            .handle(ResetPasswordCommand {
                token: "reset:7".to_string(),
                password: "weak".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::ValidationFailed { .. }));
    }
}
