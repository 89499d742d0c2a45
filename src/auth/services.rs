use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        password::{
            hash_password, is_long_enough, verify_dummy, verify_password, MIN_PASSWORD_CHARS,
        },
        repo_types::User,
    },
    db::StoreError,
    error::AppError,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Stores a new user. Emails are kept exactly as submitted.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<User, AppError> {
    if !is_valid_email(&req.email) {
        return Err(AppError::BadRequest("invalid email".into()));
    }
    if !is_long_enough(&req.password) {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters long"
        )));
    }

    let hash = hash_password(&req.password)?;

    match state.users.create(&req.email, &hash).await {
        Ok(user) => {
            info!(user_id = %user.id, "user registered");
            Ok(user)
        }
        Err(StoreError::Conflict) => {
            warn!("registration for an existing email");
            Err(AppError::BadRequest(
                "user already registered with this email".into(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns a signed token. Unknown email and wrong password fail the same way.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<String, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".into()));
    }

    let Some(user) = state.users.find_by_email(&req.email).await? else {
        verify_dummy(&req.password);
        warn!("login for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = state.keys.issue(user.id, &user.email)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}
