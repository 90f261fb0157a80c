//! Argon2id implementation of the CredentialHasher port.
//!
//! Hashes use the Argon2id variant with a cryptographically random salt.
//! The PHC string format is stored, so algorithm parameters and salt are
//! embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::CredentialHasher;

/// Argon2id credential hasher with default parameters.
#[derive(Debug, Default)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("Hashing failed: {}", e))
            })?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Stored hash is malformed: {}", e),
            )
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Verification failed: {}", e),
            )),
        }
    }
}
