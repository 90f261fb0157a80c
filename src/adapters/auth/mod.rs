//! Credential hashing and token service adapters.

mod argon2_hasher;
mod jwt_token_service;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_token_service::JwtTokenService;
