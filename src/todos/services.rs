use crate::{
    error::AppError,
    todos::{dto::UpdateTodoRequest, repo_types::Todo},
};

pub(crate) fn parse_todo_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest("invalid todo id".into()))
}

pub(crate) fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".into()));
    }
    Ok(())
}

/// Title and completion flag to write: requested values over stored ones.
pub(crate) fn merge_update(
    existing: &Todo,
    req: UpdateTodoRequest,
) -> Result<(String, bool), AppError> {
    if req.title.is_none() && req.completed.is_none() {
        return Err(AppError::BadRequest(
            "at least one of title or completed must be provided".into(),
        ));
    }
    if let Some(title) = &req.title {
        validate_title(title)?;
    }

    let title = req.title.unwrap_or_else(|| existing.title.clone());
    let completed = req.completed.unwrap_or(existing.completed);
    Ok((title, completed))
}
