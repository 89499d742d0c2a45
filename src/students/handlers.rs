use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    db::StoreError,
    error::AppError,
    json::JsonBody,
    state::AppState,
    students::{
        dto::{CreateStudentRequest, CreatedStudent},
        repo_types::Student,
        services::{parse_student_id, validate},
    },
};

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/:id", get(get_student))
}

#[instrument(skip(state, body))]
pub async fn create_student(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateStudentRequest>,
) -> Result<(StatusCode, Json<CreatedStudent>), AppError> {
    let student = validate(body)?;
    let id = state.students.create(&student).await?;
    info!(student_id = id, "student created");
    Ok((StatusCode::CREATED, Json(CreatedStudent { id })))
}

#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let id = parse_student_id(&id)?;
    match state.students.get(id).await {
        Ok(student) => Ok(Json(student)),
        Err(StoreError::NotFound) => Err(AppError::NotFound("student not found".into())),
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state))]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    Ok(Json(state.students.list().await?))
}
