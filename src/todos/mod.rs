mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

/// Every route here expects `require_auth` in front of it.
pub fn router() -> Router<AppState> {
    handlers::todo_routes()
}
