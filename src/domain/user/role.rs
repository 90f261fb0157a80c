//! User roles.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Professor,
    Student,
}

impl Role {
    /// Parses a role name, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "PROFESSOR" => Ok(Role::Professor),
            "STUDENT" => Ok(Role::Student),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("'{}' is not a valid role", other),
            )),
        }
    }

    /// Returns the canonical storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Professor => "PROFESSOR",
            Role::Student => "STUDENT",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
