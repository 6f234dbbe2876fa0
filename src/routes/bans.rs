use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    routes::helpers::resolve_user_param,
    state::AppState,
};

pub async fn ban_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(target_user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&target_user_id, &actor)?;
    if target_id == actor.id {
        return Err(AppError::InvalidInput("You cannot ban yourself".to_string()));
    }
    state.bans.ban_user(actor.id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unban_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(target_user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&target_user_id, &actor)?;
    state.bans.unban_user(actor.id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
