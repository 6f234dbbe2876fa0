//! HTTP route handlers for the Lichtbild API.
//!
//! Each sub-module handles a specific domain of functionality:
//!
//! - `login`: Session creation (login / first-contact registration)
//! - `users`: Profiles, user search, renames
//! - `photos`: Uploads, deletion, galleries and the home stream
//! - `likes`: Like/unlike and like listings
//! - `comments`: Comment/uncomment and comment listings
//! - `follows`: Follow/unfollow and follower listings
//! - `bans`: Ban/unban
//! - `health`: Health check and system status endpoints
//! - `helpers`: Shared parameter parsing

pub mod bans;
pub mod comments;
pub mod follows;
pub mod health;
pub mod helpers;
pub mod likes;
pub mod login;
pub mod photos;
pub mod users;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

/// Assembles the full application router: public endpoints, the
/// bearer-token-protected API and the static media file service.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/session", post(login::do_login))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/version", get(health::version));

    let protected = Router::new()
        .route("/users", get(users::get_users))
        .route("/users/me", get(users::get_own_profile).patch(users::set_my_username))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}/photos", get(photos::get_photos))
        .route("/users/{user_id}/stream", get(photos::get_stream))
        .route("/users/{user_id}/followers", get(follows::get_followers))
        .route("/users/{user_id}/followings", get(follows::get_followings))
        .route(
            "/users/me/followings/{target_user_id}",
            put(follows::follow_user).delete(follows::unfollow_user),
        )
        .route("/users/me/bans/{target_user_id}", put(bans::ban_user).delete(bans::unban_user))
        .route("/photos", post(photos::upload_photo))
        .route("/photos/{photo_id}", delete(photos::delete_photo))
        .route("/photos/{photo_id}/likes", get(likes::get_photo_likes))
        .route(
            "/photos/{photo_id}/likes/me",
            put(likes::like_photo).delete(likes::unlike_photo),
        )
        .route(
            "/photos/{photo_id}/comments",
            get(comments::get_photo_comments).post(comments::comment_photo),
        )
        .route("/photos/{photo_id}/comments/{comment_id}", delete(comments::uncomment_photo))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let media_service = ServeDir::new(state.config.media.directory.clone());
    let media_path = state.config.media.url_path.clone();

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service(&media_path, media_service)
        .with_state(state)
}
