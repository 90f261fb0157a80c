//! Authentication middleware and extractors for axum.
//!
//! The middleware validates Bearer tokens through the `TokenService` port
//! and rejects tokens present in the revoked-token guard (populated on
//! logout). On success the token claims are injected into request
//! extensions; handlers opt into enforcement with the `RequireAuth` and
//! `RequireAdmin` extractors.
//!
//! ```text
//! Request -> auth_middleware -> injects TokenClaims into extensions
//!                                      |
//!                              Handler -> RequireAuth reads extensions
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::ErrorResponse;
use crate::ports::{AuthError, IdempotencyGuard, TokenClaims, TokenService};

/// Auth middleware state.
#[derive(Clone)]
pub struct AuthState {
    pub token_service: Arc<dyn TokenService>,
    /// Revoked-token namespace of the idempotency guard.
    pub revoked_tokens: Arc<dyn IdempotencyGuard>,
}

/// Validates Bearer tokens and injects claims into request extensions.
///
/// Requests without an Authorization header pass through untouched so
/// public routes keep working; `RequireAuth` turns the absence into a 401
/// where it matters.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        return next.run(request).await;
    };

    let claims = match state.token_service.validate_session(&token) {
        Ok(claims) => claims,
        Err(e) => {
            let (status, code, message) = match &e {
                AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token expired"),
                AuthError::ServiceUnavailable(msg) => {
                    tracing::error!(error = %msg, "Auth service unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "AUTH_UNAVAILABLE",
                        "Authentication service unavailable",
                    )
                }
                _ => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "Invalid token"),
            };
            return (status, Json(ErrorResponse::new(code, message))).into_response();
        }
    };

    // Tokens claimed on logout are dead until they expire on their own.
    match state.revoked_tokens.is_claimed(&token).await {
        Ok(false) => {}
        Ok(true) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("TOKEN_REVOKED", "Token has been revoked")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Revocation check failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new(
                    "AUTH_UNAVAILABLE",
                    "Authentication service unavailable",
                )),
            )
                .into_response();
        }
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub TokenClaims);

/// Rejection for missing authentication.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<TokenClaims>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthenticationRequired)
        })
    }
}

/// Extractor that additionally requires the ADMIN role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub TokenClaims);

/// Rejection for missing authentication or insufficient role.
pub enum AdminRequired {
    Unauthenticated,
    Forbidden,
}

impl IntoResponse for AdminRequired {
    fn into_response(self) -> Response {
        match self {
            AdminRequired::Unauthenticated => AuthenticationRequired.into_response(),
            AdminRequired::Forbidden => {
                let error = ErrorResponse::new("FORBIDDEN", "Administrator role is required");
                (StatusCode::FORBIDDEN, Json(error)).into_response()
            }
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let claims = parts
                .extensions
                .get::<TokenClaims>()
                .cloned()
                .ok_or(AdminRequired::Unauthenticated)?;

            if !claims.role.is_admin() {
                return Err(AdminRequired::Forbidden);
            }

            Ok(RequireAdmin(claims))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::user::Role;
    use axum::extract::FromRequestParts;
    use axum::http::Request as HttpRequest;

    fn claims(role: Role) -> TokenClaims {
        TokenClaims {
            user_id: UserId::new(7),
            role,
            jti: "jti-7".to_string(),
            expires_at: 4_102_444_800,
        }
    }

    #[tokio::test]
    async fn require_auth_reads_claims_from_extensions() {
        let request = HttpRequest::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(claims(Role::Student));

        let RequireAuth(extracted) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap_or_else(|_| panic!("extraction should succeed"));

        assert_eq!(extracted.user_id, UserId::new(7));
    }

    #[tokio::test]
    async fn require_auth_rejects_missing_claims() {
        let request = HttpRequest::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        assert!(RequireAuth::from_request_parts(&mut parts, &())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn require_admin_rejects_non_admin_roles() {
        let request = HttpRequest::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(claims(Role::Student));

        assert!(matches!(
            RequireAdmin::from_request_parts(&mut parts, &()).await,
            Err(AdminRequired::Forbidden)
        ));
    }

    #[tokio::test]
    async fn require_admin_accepts_admins() {
        let request = HttpRequest::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(claims(Role::Admin));

        assert!(RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .is_ok());
    }
}
