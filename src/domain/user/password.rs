//! Password policy validation.
//!
//! Hashing itself lives behind the `CredentialHasher` port; the domain only
//! enforces the registration policy: at least 8 characters, at least one
//! special character, and no characters outside the allowed set.

use crate::domain::foundation::ValidationError;

/// Characters that count as "special" for the password policy.
const SPECIAL_CHARS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// Minimum password length for registration and reset.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validates a plaintext password against the registration policy.
pub fn validate_password(raw: &str) -> Result<(), ValidationError> {
    if raw.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::invalid_format(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    if !raw.chars().any(|c| SPECIAL_CHARS.contains(&c)) {
        return Err(ValidationError::invalid_format(
            "password",
            "must include at least one special character (!@#$%^&*)",
        ));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(&c);
    if !raw.chars().all(allowed) {
        return Err(ValidationError::invalid_format(
            "password",
            "may only contain letters, digits and !@#$%^&*",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_policy_compliant_password() {
        assert!(validate_password("Sup3rSecret!").is_ok());
        assert!(validate_password("abcdefg#").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        assert!(validate_password("Ab1!").is_err());
        assert!(validate_password("abc#efg").is_err());
    }

    #[test]
    fn rejects_password_without_special_char() {
        assert!(validate_password("abcdefgh1").is_err());
    }

    #[test]
    fn rejects_disallowed_characters() {
        assert!(validate_password("senha com espaco!").is_err());
        assert!(validate_password("abcdefg!ç").is_err());
    }

    #[test]
    fn boundary_length_is_accepted() {
        // Exactly MIN_PASSWORD_LEN characters including one special.
        assert!(validate_password("abcdefg!").is_ok());
    }
}
