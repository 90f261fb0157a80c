//! User aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

use super::{Cpf, Role};

/// A registered platform user.
///
/// `password_hash` holds the Argon2id PHC string; it never leaves the
/// backend (response DTOs omit it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub state: String,
    pub about: String,
    pub profile_picture: Option<String>,
    pub cpf: Cpf,
    pub profession: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub state: String,
    pub about: String,
    pub profile_picture: Option<String>,
    pub cpf: Cpf,
    pub profession: Option<String>,
}

/// Default profile values applied at registration.
const DEFAULT_STATE: &str = "Brasília-DF";
const DEFAULT_ABOUT: &str = "Bem-vindo(a) à plataforma";

impl NewUser {
    /// Builds a registration candidate with default profile attributes.
    ///
    /// Name and email must be non-empty; the email must look like an
    /// address. Password policy and CPF format are validated by their own
    /// value objects before this is called.
    pub fn registration(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        cpf: Cpf,
        profession: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if email.trim().is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format(
                "email",
                "missing @ symbol",
            ));
        }

        Ok(Self {
            name,
            email: email.trim().to_string(),
            password_hash: password_hash.into(),
            role,
            state: DEFAULT_STATE.to_string(),
            about: DEFAULT_ABOUT.to_string(),
            profile_picture: None,
            cpf,
            profession,
        })
    }
}

/// Partial update of mutable profile attributes. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub state: Option<String>,
    pub about: Option<String>,
    pub cpf: Option<Cpf>,
    pub profession: Option<String>,
}

impl User {
    /// Applies a partial profile update in place.
    pub fn apply_update(&mut self, update: UserUpdate, now: Timestamp) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(about) = update.about {
            self.about = about;
        }
        if let Some(cpf) = update.cpf {
            self.cpf = cpf;
        }
        if let Some(profession) = update.profession {
            self.profession = Some(profession);
        }
        self.updated_at = now;
    }
}
