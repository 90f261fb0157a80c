//! CPF value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Brazilian taxpayer registry number (CPF), stored as exactly 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Validates and constructs a CPF from its digit string.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("cpf"));
        }
        if trimmed.len() != 11 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "cpf",
                "must be exactly 11 digits",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_eleven_digits() {
        let cpf = Cpf::new("12345678901").unwrap();
        assert_eq!(cpf.as_str(), "12345678901");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let cpf = Cpf::new(" 12345678901 ").unwrap();
        assert_eq!(cpf.as_str(), "12345678901");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Cpf::new("123").is_err());
        assert!(Cpf::new("123456789012").is_err());
    }

    #[test]
    fn rejects_non_digits() {
        assert!(Cpf::new("123.456.789-01").is_err());
        assert!(Cpf::new("1234567890a").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(Cpf::new("").is_err());
        assert!(Cpf::new("   ").is_err());
    }

    proptest! {
        #[test]
        fn any_eleven_digit_string_is_accepted(digits in "[0-9]{11}") {
            let cpf = Cpf::new(digits.clone()).unwrap();
            prop_assert_eq!(cpf.as_str(), digits.as_str());
        }

        #[test]
        fn other_lengths_are_rejected(digits in "[0-9]{0,10}|[0-9]{12,20}") {
            prop_assert!(Cpf::new(digits).is_err());
        }
    }
}
