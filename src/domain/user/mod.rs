//! User domain: accounts, roles and credential policy.

mod aggregate;
mod cpf;
mod errors;
mod password;
mod role;

pub use aggregate::{NewUser, User, UserUpdate};
pub use cpf::Cpf;
pub use errors::UserError;
pub use password::{validate_password, MIN_PASSWORD_LEN};
pub use role::Role;
