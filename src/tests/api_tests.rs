#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt; // for .collect()
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::tests::support::test_state;

    const PNG_PAYLOAD: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 9, 9, 9];

    async fn setup_test_app() -> (axum::Router, crate::state::AppState, tempfile::NamedTempFile, tempfile::TempDir)
    {
        let (state, db_guard, media_guard) = test_state().await;
        let app = build_router(state.clone());
        (app, state, db_guard, media_guard)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    /// Logs `name` in through the HTTP surface and returns its bearer token.
    async fn login(app: &axum::Router, name: &str) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/session")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": name }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            response.status() == StatusCode::CREATED || response.status() == StatusCode::OK,
            "login failed: {}",
            response.status()
        );
        let json = body_json(response).await;
        json["identifier"].as_str().unwrap().to_string()
    }

    fn authed(token: &str) -> axum::http::request::Builder {
        Request::builder().header("authorization", format!("Bearer {}", token))
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let (app, _, _db, _media) = setup_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readyz_endpoint() {
        let (app, _, _db, _media) = setup_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (app, _, _db, _media) = setup_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json.get("uptime_seconds").is_some());
        assert!(json.get("logins").is_some());
        assert!(json.get("photos_uploaded").is_some());
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let (app, _, _db, _media) = setup_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json.get("name").is_some());
        assert!(json.get("version").is_some());
        assert!(json.get("build").is_some());
    }

    #[tokio::test]
    async fn test_login_creates_then_reuses() {
        let (app, _, _db, _media) = setup_test_app().await;

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/session")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": "alice" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/session")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": "alice" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_rejects_short_names() {
        let (app, _, _db, _media) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/session")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": "ab" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        let (app, _, _db, _media) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header("authorization", "Bearer bogus")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_gallery_like_comment_flow() {
        let (app, _, _db, _media) = setup_test_app().await;
        let alice = login(&app, "alice").await;
        let bob = login(&app, "bob").await;

        // Alice uploads a photo
        let response = app
            .clone()
            .oneshot(
                authed(&alice)
                    .method("POST")
                    .uri("/photos")
                    .body(Body::from(PNG_PAYLOAD.to_vec()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let photo = body_json(response).await;
        let photo_id = photo["id"].as_i64().unwrap();
        assert!(photo["url"].as_str().unwrap().ends_with(".png"));

        // Bob likes and comments it
        let response = app
            .clone()
            .oneshot(
                authed(&bob)
                    .method("PUT")
                    .uri(format!("/photos/{}/likes/me", photo_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(
                authed(&bob)
                    .method("POST")
                    .uri(format!("/photos/{}/comments", photo_id))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "content": "sehr schön" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Bob reads alice's gallery: totals and liked flag are joined in
        let response = app
            .clone()
            .oneshot(
                authed(&bob)
                    .uri("/users/1/photos?offset=0&limit=20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_json(response).await;
        assert_eq!(page["offset"], 0);
        assert_eq!(page["limit"], 20);
        assert_eq!(page["totalCount"], 1);
        let entries = page["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["totalLikes"], 1);
        assert_eq!(entries[0]["totalComments"], 1);
        assert_eq!(entries[0]["userLiked"], true);
    }

    #[tokio::test]
    async fn test_stream_hides_banned_users_over_http() {
        let (app, _, _db, _media) = setup_test_app().await;
        let alice = login(&app, "alice").await;
        let bob = login(&app, "bob").await;

        // Bob uploads; alice follows bob
        let response = app
            .clone()
            .oneshot(
                authed(&bob)
                    .method("POST")
                    .uri("/photos")
                    .body(Body::from(PNG_PAYLOAD.to_vec()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                authed(&alice)
                    .method("PUT")
                    .uri("/users/me/followings/2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(authed(&alice).uri("/users/me/stream").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_json(response).await;
        assert_eq!(page["totalCount"], 1);

        // Alice bans bob: his photos vanish from her stream
        let response = app
            .clone()
            .oneshot(
                authed(&alice).method("PUT").uri("/users/me/bans/2").body(Body::empty()).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(authed(&alice).uri("/users/me/stream").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_json(response).await;
        assert_eq!(page["totalCount"], 0);
        assert_eq!(page["entries"], json!([]));

        // And bob sees alice's profile as missing
        let response = app
            .clone()
            .oneshot(authed(&bob).uri("/users/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stream_is_owner_only() {
        let (app, _, _db, _media) = setup_test_app().await;
        let _alice = login(&app, "alice").await;
        let bob = login(&app, "bob").await;

        let response = app
            .oneshot(authed(&bob).uri("/users/1/stream").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image_payload() {
        let (app, _, _db, _media) = setup_test_app().await;
        let alice = login(&app, "alice").await;

        let response = app
            .oneshot(
                authed(&alice)
                    .method("POST")
                    .uri("/photos")
                    .body(Body::from("not an image"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_rename_via_patch_and_cache_invalidation() {
        let (app, state, _db, _media) = setup_test_app().await;
        let alice = login(&app, "alice").await;

        // Warm the identity cache
        let response = app
            .clone()
            .oneshot(authed(&alice).uri("/users/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                authed(&alice)
                    .method("PATCH")
                    .uri("/users/me")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "op": "replace", "path": "/username", "value": "alicia" })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let profile = body_json(response).await;
        assert_eq!(profile["username"], "alicia");

        // The cached identity was dropped with the rename
        assert!(state.auth_cache.get(&alice).is_none());

        let response = app
            .clone()
            .oneshot(authed(&alice).uri("/users/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let profile = body_json(response).await;
        assert_eq!(profile["username"], "alicia");

        // Invalid patch shapes are rejected
        let response = app
            .oneshot(
                authed(&alice)
                    .method("PATCH")
                    .uri("/users/me")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "op": "add", "path": "/username", "value": "x" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_search_over_http() {
        let (app, _, _db, _media) = setup_test_app().await;
        let alice = login(&app, "alice").await;
        let _bob = login(&app, "bobby").await;

        let response = app
            .oneshot(authed(&alice).uri("/users?username=bob").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let users = body_json(response).await;
        let users = users.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["username"], "bobby");
    }
}
