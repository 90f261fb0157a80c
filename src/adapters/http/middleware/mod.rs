//! HTTP middleware.

mod auth;

pub use auth::{auth_middleware, AuthState, RequireAdmin, RequireAuth};
