use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use super::jwt::{AuthRejection, JwtKeys};
use crate::error::AppError;

/// Identity the auth gate bound to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// Gate for the protected router: verifies the bearer token and stores the
/// caller's `AuthUser` in the request extensions. Handlers never run on
/// rejection.
pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let outcome = match request.headers().get(AUTHORIZATION) {
        None => keys.authorize(None),
        Some(value) => match value.to_str() {
            Ok(raw) => keys.authorize(Some(raw)),
            Err(_) => Err(AuthRejection::InvalidHeader),
        },
    };

    let user_id = outcome.map_err(|reason| {
        warn!(%reason, uri = %request.uri(), "request rejected by auth gate");
        AppError::from(reason)
    })?;

    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().copied().ok_or_else(|| {
            error!(uri = %parts.uri, "handler reached without auth gate");
            AppError::Internal("user identity missing from request context".into())
        })
    }
}
