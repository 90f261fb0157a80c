//! HS256 JWT implementation of the TokenService port.
//!
//! Session and password-reset tokens share the signing secret but carry
//! different `aud` claims, so one can never be replayed as the other.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::UserId;
use crate::domain::user::Role;
use crate::ports::{AuthError, TokenClaims, TokenService};

const SESSION_AUDIENCE: &str = "session";
const RESET_AUDIENCE: &str = "password-reset";

/// JWT claims as encoded on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject -- the user's numeric id, as a string.
    sub: String,
    /// Role name for session tokens; absent on reset tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    /// Token audience, distinguishing session from reset tokens.
    aud: String,
    /// Expiration time (UTC Unix timestamp).
    exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    iat: i64,
    /// Unique token identifier (UUID v4).
    jti: String,
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_secs: i64,
    reset_ttl_secs: i64,
}

impl JwtTokenService {
    /// Creates a service signing with the given secret.
    pub fn new(secret: &str, session_ttl_secs: i64, reset_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl_secs,
            reset_ttl_secs,
        }
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))
    }

    fn decode_claims(&self, token: &str, audience: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

impl TokenService for JwtTokenService {
    fn issue_session(&self, user_id: UserId, role: Role) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role: Some(role.as_str().to_string()),
            aud: SESSION_AUDIENCE.to_string(),
            exp: now + self.session_ttl_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        self.encode_claims(&claims)
    }

    fn validate_session(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.decode_claims(token, SESSION_AUDIENCE)?;

        let user_id: UserId = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        let role = claims
            .role
            .as_deref()
            .ok_or(AuthError::InvalidToken)
            .and_then(|r| Role::parse(r).map_err(|_| AuthError::InvalidToken))?;

        Ok(TokenClaims {
            user_id,
            role,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }

    fn issue_reset(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role: None,
            aud: RESET_AUDIENCE.to_string(),
            exp: now + self.reset_ttl_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        self.encode_claims(&claims)
    }

    fn validate_reset(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.decode_claims(token, RESET_AUDIENCE)?;
        claims.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new("test-secret-that-is-long-enough-for-hmac", 7200, 3600)
    }

    #[test]
    fn session_token_roundtrip() {
        let service = service();

        let token = service
            .issue_session(UserId::new(7), Role::Professor)
            .unwrap();
        let claims = service.validate_session(&token).unwrap();

        assert_eq!(claims.user_id, UserId::new(7));
        assert_eq!(claims.role, Role::Professor);
        assert!(!claims.jti.is_empty());
        assert!(claims.expires_at > chrono::Utc::now().timestamp());
    }

    #[test]
    fn reset_token_roundtrip() {
        let service = service();

        let token = service.issue_reset(UserId::new(7)).unwrap();
        let user_id = service.validate_reset(&token).unwrap();

        assert_eq!(user_id, UserId::new(7));
    }

    #[test]
    fn reset_token_is_not_a_session_token() {
        let service = service();

        let token = service.issue_reset(UserId::new(7)).unwrap();

        assert_eq!(
            service.validate_session(&token).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn session_token_is_not_a_reset_token() {
        let service = service();

        let token = service.issue_session(UserId::new(7), Role::Student).unwrap();

        assert_eq!(
            service.validate_reset(&token).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn expired_session_token_fails() {
        // Negative TTL issues an already-expired token, well past the
        // default 60 second validation leeway.
        let service = JwtTokenService::new("secret-alpha", -300, 3600);

        let token = service.issue_session(UserId::new(1), Role::Student).unwrap();

        assert_eq!(
            service.validate_session(&token).unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[test]
    fn token_signed_with_different_secret_fails() {
        let service_a = JwtTokenService::new("secret-alpha", 7200, 3600);
        let service_b = JwtTokenService::new("secret-bravo", 7200, 3600);

        let token = service_a
            .issue_session(UserId::new(1), Role::Student)
            .unwrap();

        assert_eq!(
            service_b.validate_session(&token).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert_eq!(
            service().validate_session("not.a.token").unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
