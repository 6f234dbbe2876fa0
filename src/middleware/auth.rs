use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::types::BaseUser;

/// The authenticated identity of the current request, inserted by
/// [`auth_middleware`] and extracted by protected handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub BaseUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Missing authentication".to_string()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

/// Middleware that resolves the `Authorization: Bearer <token>` header to a
/// user, through the LRU identity cache, and rejects requests without a
/// valid token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let user = match state.auth_cache.get(token) {
        Some(user) => user,
        None => {
            let user = state.auth.authorize(token).await?;
            state.auth_cache.put(token.to_string(), user.clone());
            user
        }
    };

    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}
