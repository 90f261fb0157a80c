//! CredentialHasher port - password hashing and verification.

use crate::domain::foundation::DomainError;

/// Port for credential hashing.
///
/// Hashing is CPU-bound and fast enough to run inline, so the port is
/// synchronous; callers inside async handlers invoke it directly.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for malformed
    /// hashes.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
