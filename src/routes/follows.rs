use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::AppResult,
    middleware::AuthUser,
    routes::helpers::resolve_user_param,
    state::AppState,
};

pub async fn follow_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(target_user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&target_user_id, &actor)?;
    state.follows.follow_user(actor.id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unfollow_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(target_user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&target_user_id, &actor)?;
    state.follows.unfollow_user(actor.id, target_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_followers(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&user_id, &actor)?;
    let followers = state.follows.get_followers(actor.id, target_id).await?;
    Ok(Json(followers))
}

pub async fn get_followings(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&user_id, &actor)?;
    let followings = state.follows.get_followings(actor.id, target_id).await?;
    Ok(Json(followings))
}
