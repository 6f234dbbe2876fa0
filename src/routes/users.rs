use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    error::{validation, AppError, AppResult},
    middleware::AuthUser,
    routes::helpers::resolve_user_param,
    state::AppState,
    types::{SetUsernameRequest, UserSearchQuery},
};

pub async fn get_users(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(query): Query<UserSearchQuery>,
) -> AppResult<impl IntoResponse> {
    let users = state.users.search(actor.id, &query.username).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&user_id, &actor)?;
    let profile = state.users.get_profile(actor.id, target_id).await?;
    Ok(Json(profile))
}

/// GET /users/me - the path is registered statically for the PATCH below,
/// so the profile read needs its own handler here.
pub async fn get_own_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> AppResult<impl IntoResponse> {
    let profile = state.users.get_profile(actor.id, actor.id).await?;
    Ok(Json(profile))
}

/// PATCH /users/me with `{"op": "replace", "path": "/username", "value": ..}`.
pub async fn set_my_username(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(req): Json<SetUsernameRequest>,
) -> AppResult<impl IntoResponse> {
    if req.op != "replace" {
        return Err(AppError::ValidationError {
            field: "op".to_string(),
            message: "Op value is not valid".to_string(),
        });
    }
    if req.path != "/username" {
        return Err(AppError::ValidationError {
            field: "path".to_string(),
            message: "Path value is not valid".to_string(),
        });
    }
    validation::validate_username(&req.value)?;

    let profile = state.users.update_username(actor.id, &req.value).await?;
    // Cached bearer identities may carry the old name
    state.auth_cache.clear();
    Ok(Json(profile))
}
