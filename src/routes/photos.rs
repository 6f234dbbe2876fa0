use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    routes::helpers::{clamp_page, resolve_user_param},
    state::AppState,
    types::PageQuery,
};

/// GET /users/{user_id}/photos - a user's gallery, paginated.
pub async fn get_photos(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&user_id, &actor)?;
    let (offset, limit) = clamp_page(&query, &state.config.pagination);
    let page = state.photos.get_user_photos(actor.id, target_id, offset, limit).await?;
    Ok(Json(page))
}

/// GET /users/{user_id}/stream - the home stream; only the owner may read it.
pub async fn get_stream(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let target_id = resolve_user_param(&user_id, &actor)?;
    if target_id != actor.id {
        return Err(AppError::Forbidden("You can only read your own stream".to_string()));
    }
    let (offset, limit) = clamp_page(&query, &state.config.pagination);
    let page = state.photos.get_stream(actor.id, offset, limit).await?;
    Ok(Json(page))
}

/// POST /photos - raw image body (JPEG, PNG or WebP).
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Photo payload must not be empty".to_string()));
    }
    let size = body.len() as u64;
    let photo = state.photos.create_photo(actor.id, body).await?;
    state.metrics.inc_photos_uploaded();
    state.metrics.add_media_bytes(size);
    Ok((StatusCode::CREATED, Json(photo)))
}

pub async fn delete_photo(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(photo_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    state.photos.delete_photo(actor.id, photo_id).await?;
    state.metrics.inc_photos_deleted();
    Ok(StatusCode::NO_CONTENT)
}
