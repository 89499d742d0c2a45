use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
mod password;
pub mod repo;
pub mod repo_types;
mod services;

pub use extractors::{require_auth, AuthUser};
pub use jwt::JwtKeys;
pub(crate) use services::is_valid_email;

/// Public routes: register and login.
pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Routes that expect `require_auth` in front of them.
pub fn protected_router() -> Router<AppState> {
    handlers::me_routes()
}
