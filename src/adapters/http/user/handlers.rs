//! HTTP handlers for user endpoints.
//!
//! These handlers connect axum routes to the application layer command and
//! query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::user::{
    ChangePasswordCommand, ChangePasswordHandler, DeleteUserHandler, ForgotPasswordCommand,
    ForgotPasswordHandler, GetUserHandler, GetUserQuery, ListUsersHandler, LoginUserCommand,
    LoginUserHandler, LogoutUserCommand, LogoutUserHandler, RegisterUserCommand,
    RegisterUserHandler, ResetPasswordCommand, ResetPasswordHandler, SetProfilePictureCommand,
    SetProfilePictureHandler, UpdateUserCommand, UpdateUserHandler,
};
use crate::domain::foundation::UserId;
use crate::domain::user::UserError;
use crate::ports::{
    CredentialHasher, EntitlementStore, IdempotencyGuard, Mailer, TokenService, UserRepository,
};

use super::dto::{
    AuthResponse, ChangePasswordRequest, EntitlementResponse, ForgotPasswordRequest, LoginRequest,
    MessageResponse, ProfilePictureRequest, RegisterRequest, ResetPasswordRequest,
    UpdateUserRequest, UserDetailResponse, UserResponse,
};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the user module, cloned per request.
#[derive(Clone)]
pub struct UserAppState {
    pub user_repository: Arc<dyn UserRepository>,
    pub entitlement_store: Arc<dyn EntitlementStore>,
    pub credential_hasher: Arc<dyn CredentialHasher>,
    pub token_service: Arc<dyn TokenService>,
    pub mailer: Arc<dyn Mailer>,
    pub revoked_tokens: Arc<dyn IdempotencyGuard>,
    /// Client-side page password-reset links point at.
    pub reset_url: String,
}

impl UserAppState {
    pub fn register_handler(&self) -> RegisterUserHandler {
        RegisterUserHandler::new(
            self.user_repository.clone(),
            self.credential_hasher.clone(),
            self.token_service.clone(),
        )
    }

    pub fn login_handler(&self) -> LoginUserHandler {
        LoginUserHandler::new(
            self.user_repository.clone(),
            self.credential_hasher.clone(),
            self.token_service.clone(),
        )
    }

    pub fn logout_handler(&self) -> LogoutUserHandler {
        LogoutUserHandler::new(self.token_service.clone(), self.revoked_tokens.clone())
    }

    pub fn list_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.user_repository.clone())
    }

    pub fn get_handler(&self) -> GetUserHandler {
        GetUserHandler::new(self.user_repository.clone(), self.entitlement_store.clone())
    }

    pub fn update_handler(&self) -> UpdateUserHandler {
        UpdateUserHandler::new(self.user_repository.clone())
    }

    pub fn delete_handler(&self) -> DeleteUserHandler {
        DeleteUserHandler::new(self.user_repository.clone())
    }

    pub fn change_password_handler(&self) -> ChangePasswordHandler {
        ChangePasswordHandler::new(self.user_repository.clone(), self.credential_hasher.clone())
    }

    pub fn forgot_password_handler(&self) -> ForgotPasswordHandler {
        ForgotPasswordHandler::new(
            self.user_repository.clone(),
            self.token_service.clone(),
            self.mailer.clone(),
            self.reset_url.clone(),
        )
    }

    pub fn reset_password_handler(&self) -> ResetPasswordHandler {
        ResetPasswordHandler::new(
            self.user_repository.clone(),
            self.token_service.clone(),
            self.credential_hasher.clone(),
        )
    }

    pub fn profile_picture_handler(&self) -> SetProfilePictureHandler {
        SetProfilePictureHandler::new(self.user_repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/users/register
pub async fn register(
    State(state): State<UserAppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    let result = state
        .register_handler()
        .handle(RegisterUserCommand {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
            cpf: request.cpf,
            profession: request.profession,
        })
        .await?;

    let response = AuthResponse {
        user: UserResponse::from(result.user),
        token: result.token,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<UserAppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    let result = state
        .login_handler()
        .handle(LoginUserCommand {
            email: request.email,
            password: request.password,
            role: request.role,
        })
        .await?;

    let response = AuthResponse {
        user: UserResponse::from(result.user),
        token: result.token,
    };

    Ok(Json(response))
}

/// POST /api/users/logout
pub async fn logout(
    State(state): State<UserAppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, UserApiError> {
    let token = headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| UserError::validation("authorization", "Bearer token is required"))?;

    state
        .logout_handler()
        .handle(LogoutUserCommand {
            token: token.to_string(),
        })
        .await?;

    Ok(Json(MessageResponse::new("Logout successful")))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<UserAppState>,
    _auth: RequireAuth,
) -> Result<impl IntoResponse, UserApiError> {
    let users = state.list_handler().handle().await?;

    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<UserAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, UserApiError> {
    let result = state
        .get_handler()
        .handle(GetUserQuery {
            user_id: UserId::new(id),
        })
        .await?;

    let response = UserDetailResponse {
        user: UserResponse::from(result.user),
        courses: result
            .entitlements
            .into_iter()
            .map(EntitlementResponse::from)
            .collect(),
    };

    Ok(Json(response))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<UserAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    let user = state
        .update_handler()
        .handle(UpdateUserCommand {
            user_id: UserId::new(id),
            name: request.name,
            email: request.email,
            state: request.state,
            about: request.about,
            cpf: request.cpf,
            profession: request.profession,
        })
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<UserAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, UserApiError> {
    state.delete_handler().handle(UserId::new(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/users/:id/password
pub async fn change_password(
    State(state): State<UserAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    state
        .change_password_handler()
        .handle(ChangePasswordCommand {
            user_id: UserId::new(id),
            current_password: request.current_password,
            new_password: request.new_password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// POST /api/users/forgot-password
pub async fn forgot_password(
    State(state): State<UserAppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    state
        .forgot_password_handler()
        .handle(ForgotPasswordCommand {
            email: request.email,
        })
        .await?;

    Ok(Json(MessageResponse::new("Reset email sent")))
}

/// POST /api/users/reset-password
pub async fn reset_password(
    State(state): State<UserAppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    state
        .reset_password_handler()
        .handle(ResetPasswordCommand {
            token: request.token,
            password: request.password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// POST /api/users/:id/profile-picture
pub async fn set_profile_picture(
    State(state): State<UserAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(request): Json<ProfilePictureRequest>,
) -> Result<impl IntoResponse, UserApiError> {
    let user = state
        .profile_picture_handler()
        .handle(SetProfilePictureCommand {
            user_id: UserId::new(id),
            profile_picture: Some(request.profile_picture),
        })
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/:id/profile-picture
pub async fn remove_profile_picture(
    State(state): State<UserAppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, UserApiError> {
    let user = state
        .profile_picture_handler()
        .handle(SetProfilePictureCommand {
            user_id: UserId::new(id),
            profile_picture: None,
        })
        .await?;

    Ok(Json(UserResponse::from(user)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type converting user errors to HTTP responses.
pub struct UserApiError(UserError);

impl From<UserError> for UserApiError {
    fn from(err: UserError) -> Self {
        Self(err)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => StatusCode::NOT_FOUND,
            UserError::DuplicateCpf(_) | UserError::DuplicateEmail(_) => StatusCode::CONFLICT,
            UserError::InvalidCredentials | UserError::TokenExpired | UserError::TokenRevoked => {
                StatusCode::UNAUTHORIZED
            }
            UserError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            UserError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}
