//! Axum router configuration for user endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    change_password, delete_user, forgot_password, get_user, list_users, login, logout, register,
    remove_profile_picture, reset_password, set_profile_picture, update_user, UserAppState,
};

/// Create the user API router.
///
/// # Routes
///
/// ## Public
/// - `POST /register` - Create an account
/// - `POST /login` - Authenticate and receive a session token
/// - `POST /forgot-password` - Request a reset email
/// - `POST /reset-password` - Set a new password with a reset token
///
/// ## Authenticated
/// - `POST /logout` - Revoke the current session token
/// - `GET /` - List users
/// - `GET /:id` - Get one user with their course entitlements
/// - `PUT /:id` - Update profile attributes
/// - `DELETE /:id` - Delete the account
/// - `PUT /:id/password` - Change password
/// - `POST /:id/profile-picture` - Set the profile picture URL
/// - `DELETE /:id/profile-picture` - Remove the profile picture
pub fn user_routes() -> Router<UserAppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/password", put(change_password))
        .route(
            "/:id/profile-picture",
            post(set_profile_picture).delete(remove_profile_picture),
        )
}
