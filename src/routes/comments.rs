use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::{validation, AppResult},
    middleware::AuthUser,
    state::AppState,
    types::CommentRequest,
};

pub async fn get_photo_comments(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(photo_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let comments = state.comments.get_photo_comments(photo_id, actor.id).await?;
    Ok(Json(comments))
}

pub async fn comment_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(photo_id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> AppResult<impl IntoResponse> {
    validation::validate_comment_content(&req.content)?;
    let comment = state.comments.comment_photo(photo_id, actor.id, &req.content).await?;
    state.metrics.inc_comments_set();
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn uncomment_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((photo_id, comment_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    state.comments.uncomment_photo(photo_id, comment_id, actor.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
