use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{validation, AppResult},
    state::AppState,
    types::{LoginRequest, LoginResponse},
};

/// Logs a user in by name, creating the account on first contact.
/// Answers 201 when a new account was created, 200 otherwise.
pub async fn do_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    validation::validate_username(&req.name)?;

    let (token, created) = state.auth.login(&req.name).await?;
    state.metrics.inc_logins();
    if created {
        state.metrics.inc_users_created();
    }

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(LoginResponse { identifier: token })).into_response())
}
