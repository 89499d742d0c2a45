use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        repo_types::User,
        services,
    },
    error::AppError,
    json::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Needs the auth gate in front of it.
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = services::login(&state, payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, AppError> {
    match state.users.find_by_id(user_id).await? {
        Some(user) => Ok(Json(user)),
        None => {
            warn!(%user_id, "token for a user that no longer exists");
            Err(AppError::Unauthorized("user not found".into()))
        }
    }
}
