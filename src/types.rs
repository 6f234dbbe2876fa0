use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Basic information about someone with a Lichtbild account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUser {
    pub id: i64,
    pub username: String,
}

/// Extended profile information: photo/follower counts and, when requested by
/// another user, whether the profile owner is banned for the requester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullUser {
    pub id: i64,
    pub username: String,
    pub total_photos: i64,
    pub total_followers: i64,
    pub total_followings: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned_for_user: Option<bool>,
}

/// A photo published by a user, enriched with like/comment totals and whether
/// the requesting user liked it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i64,
    pub url: String,
    pub upload_date: DateTime<Utc>,
    pub owner: BaseUser,
    pub total_likes: i64,
    pub total_comments: i64,
    pub user_liked: bool,
}

/// A like put on a photo by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub photo_id: i64,
    pub owner: BaseUser,
}

/// A comment published under a photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub content: String,
    pub photo_id: i64,
    pub owner: BaseUser,
}

/// A page of photo entries plus the total count of the filtered collection.
///
/// `entries` is always present in the serialized form; an empty page renders
/// as `[]`, never as an absent field. `total_count` is computed by an
/// independent query sharing the same visibility filters (see
/// [`crate::pagination`] for the consistency caveat).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedPhotos {
    pub offset: i64,
    pub limit: i64,
    pub entries: Vec<Photo>,
    pub total_count: i64,
}

// Request/response DTOs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub identifier: String,
}

/// PATCH /users/me payload:
/// `{"op": "replace", "path": "/username", "value": "<new name>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetUsernameRequest {
    pub op: String,
    pub path: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: i64,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub username: String,
}
