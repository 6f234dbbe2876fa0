use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{error::AppResult, middleware::AuthUser, state::AppState};

pub async fn get_photo_likes(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(photo_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let likes = state.likes.get_photo_likes(photo_id, actor.id).await?;
    Ok(Json(likes))
}

pub async fn like_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(photo_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    state.likes.like_photo(photo_id, actor.id).await?;
    state.metrics.inc_likes_set();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlike_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(photo_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    state.likes.unlike_photo(photo_id, actor.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
