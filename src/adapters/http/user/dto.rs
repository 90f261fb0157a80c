//! Request/response DTOs for user endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::enrollment::Entitlement;
use crate::domain::foundation::UserId;
use crate::domain::user::User;

/// POST /api/users/register request.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub cpf: String,
    pub profession: Option<String>,
}

/// POST /api/users/login request.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// PUT /api/users/:id request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub state: Option<String>,
    pub about: Option<String>,
    pub cpf: Option<String>,
    pub profession: Option<String>,
}

/// PUT /api/users/:id/password request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/users/forgot-password request.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/users/reset-password request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// POST /api/users/:id/profile-picture request.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePictureRequest {
    pub profile_picture: String,
}

/// User representation in responses. The credential hash never leaves the
/// backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub state: String,
    pub about: String,
    pub profile_picture: Option<String>,
    pub cpf: String,
    pub profession: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
            state: user.state,
            about: user.about,
            profile_picture: user.profile_picture,
            cpf: user.cpf.as_str().to_string(),
            profession: user.profession,
        }
    }
}

/// Login/registration response carrying the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// One purchase record in a user detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementResponse {
    pub course_id: i64,
    pub status: String,
}

impl From<Entitlement> for EntitlementResponse {
    fn from(entitlement: Entitlement) -> Self {
        Self {
            course_id: entitlement.course_id.as_i64(),
            status: entitlement.status.as_str().to_string(),
        }
    }
}

/// GET /api/users/:id response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub courses: Vec<EntitlementResponse>,
}

/// Plain confirmation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::user::{Cpf, Role};

    #[test]
    fn user_response_omits_the_password_hash() {
        let user = User {
            id: UserId::new(1),
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "$argon2id$very-secret".to_string(),
            role: Role::Student,
            state: "Brasília-DF".to_string(),
            about: String::new(),
            profile_picture: None,
            cpf: Cpf::new("12345678901").unwrap(),
            profession: None,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();

        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert!(json.contains("maria@example.com"));
    }
}
