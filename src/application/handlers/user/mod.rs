//! User handlers: registration, sessions, credentials and profile upkeep.

mod change_password;
mod login_user;
mod manage_users;
mod register_user;
mod reset_password;

#[cfg(test)]
pub mod test_support;

pub use change_password::{ChangePasswordCommand, ChangePasswordHandler};
pub use login_user::{
    LoginUserCommand, LoginUserHandler, LoginUserResult, LogoutUserCommand, LogoutUserHandler,
};
pub use manage_users::{
    DeleteUserHandler, GetUserHandler, GetUserQuery, ListUsersHandler, SetProfilePictureCommand,
    SetProfilePictureHandler, UpdateUserCommand, UpdateUserHandler, UserWithEntitlements,
};
pub use register_user::{RegisterUserCommand, RegisterUserHandler, RegisterUserResult};
pub use reset_password::{
    ForgotPasswordCommand, ForgotPasswordHandler, ResetPasswordCommand, ResetPasswordHandler,
};
