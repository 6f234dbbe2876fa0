//! Business rules on top of the repositories: existence and mutual-ban
//! guards, fan-out orchestration for paginated listings, media persistence.
//!
//! Visibility contract: every listing operation that exposes another user's
//! content composes BOTH ban-direction fragments
//! ([`crate::repo::BansRepository::without_banned`] and
//! [`crate::repo::BansRepository::without_banners`]). Gallery and profile
//! operations additionally pre-check the mutual ban pair and answer
//! "not found", so a banned viewer cannot distinguish a ban from a missing
//! user.

pub mod auth;
pub mod bans;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod photos;
pub mod users;

pub use auth::AuthService;
pub use bans::BansService;
pub use comments::CommentsService;
pub use follows::FollowsService;
pub use likes::LikesService;
pub use photos::PhotosService;
pub use users::UsersService;
