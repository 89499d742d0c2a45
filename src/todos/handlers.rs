use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    db::StoreError,
    error::AppError,
    json::JsonBody,
    state::AppState,
    todos::{
        dto::{CreateTodoRequest, MessageResponse, UpdateTodoRequest},
        repo_types::Todo,
        services::{merge_update, parse_todo_id, validate_title},
    },
};

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

/// Missing and foreign todos look the same to the caller.
fn todo_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::NotFound("todo not found".into()),
        other => other.into(),
    }
}

#[instrument(skip(state, body))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    validate_title(&body.title)?;
    let todo = state
        .todos
        .create(user_id, &body.title, body.completed)
        .await?;
    info!(todo_id = todo.id, %user_id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.list_by_owner(user_id).await?;
    Ok(Json(todos))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_todo_id(&id)?;
    let todo = state.todos.get(id, user_id).await.map_err(todo_error)?;
    Ok(Json(todo))
}

#[instrument(skip(state, body))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let id = parse_todo_id(&id)?;
    let existing = state.todos.get(id, user_id).await.map_err(todo_error)?;
    let (title, completed) = merge_update(&existing, body)?;
    let todo = state
        .todos
        .update(id, user_id, &title, completed)
        .await
        .map_err(todo_error)?;
    Ok(Json(todo))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_todo_id(&id)?;
    state.todos.delete(id, user_id).await.map_err(todo_error)?;
    info!(todo_id = id, %user_id, "todo deleted");
    Ok(Json(MessageResponse {
        message: "todo deleted".into(),
    }))
}
