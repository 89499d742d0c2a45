use crate::{
    auth::is_valid_email,
    error::AppError,
    students::dto::{CreateStudentRequest, NewStudent},
};

/// Collects one message per bad field, e.g.
/// `field name is required, field age is invalid`.
pub(crate) fn validate(req: CreateStudentRequest) -> Result<NewStudent, AppError> {
    let mut problems = Vec::new();

    let name = match req.name.map(|n| n.trim().to_string()) {
        Some(n) if !n.is_empty() => Some(n),
        _ => {
            problems.push("field name is required".to_string());
            None
        }
    };

    let email = match req.email {
        None => {
            problems.push("field email is required".to_string());
            None
        }
        Some(e) if e.is_empty() => {
            problems.push("field email is required".to_string());
            None
        }
        Some(e) if !is_valid_email(&e) => {
            problems.push("field email is invalid".to_string());
            None
        }
        Some(e) => Some(e),
    };

    let age = match req.age {
        None => {
            problems.push("field age is required".to_string());
            None
        }
        Some(a) if a <= 0 => {
            problems.push("field age is invalid".to_string());
            None
        }
        Some(a) => Some(a),
    };

    match (name, email, age) {
        (Some(name), Some(email), Some(age)) => Ok(NewStudent { name, email, age }),
        _ => Err(AppError::BadRequest(problems.join(", "))),
    }
}

pub(crate) fn parse_student_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest("invalid student id".into()))
}
