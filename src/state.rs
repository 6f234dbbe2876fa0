use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::media::MediaStore;
use crate::metrics::Metrics;
use crate::repo::{
    AuthRepository, BansRepository, CommentsRepository, FollowsRepository, LikesRepository,
    PhotosRepository, UsersRepository,
};
use crate::service::{
    AuthService, BansService, CommentsService, FollowsService, LikesService, PhotosService,
    UsersService,
};
use crate::types::BaseUser;

const AUTH_CACHE_CAPACITY: usize = 1024;

/// LRU cache in front of the bearer-token lookup (token -> identity).
///
/// Entries never expire on their own; a username change clears the whole
/// cache so stale identities cannot be served.
#[derive(Clone)]
pub struct AuthCache {
    inner: Arc<Mutex<LruCache<String, BaseUser>>>,
}

impl AuthCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { inner: Arc::new(Mutex::new(LruCache::new(capacity))) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, BaseUser>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get(&self, token: &str) -> Option<BaseUser> {
        self.lock().get(token).cloned()
    }

    pub fn put(&self, token: String, user: BaseUser) {
        self.lock().put(token, user);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// The shared application state.
///
/// Holds the database pool, configuration, metrics, the token identity cache
/// and the service layer. Cloneable for use with Axum's request extraction.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: SqlitePool,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The application metrics.
    pub metrics: Metrics,
    /// Token -> identity cache used by the auth middleware.
    pub auth_cache: AuthCache,
    pub auth: AuthService,
    pub users: UsersService,
    pub photos: PhotosService,
    pub follows: FollowsService,
    pub bans: BansService,
    pub likes: LikesService,
    pub comments: CommentsService,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let users_repo = UsersRepository::new(db.clone());
        let auth_repo = AuthRepository::new(db.clone());
        let bans_repo = BansRepository::new(db.clone());
        let follows_repo = FollowsRepository::new(db.clone());
        let photos_repo = PhotosRepository::new(db.clone());
        let likes_repo = LikesRepository::new(db.clone());
        let comments_repo = CommentsRepository::new(db.clone());

        let media = MediaStore::new(&config.media.directory, &config.media.url_path);

        Self {
            auth: AuthService::new(auth_repo, users_repo.clone()),
            users: UsersService::new(users_repo.clone(), bans_repo.clone()),
            photos: PhotosService::new(
                media,
                users_repo.clone(),
                bans_repo.clone(),
                photos_repo.clone(),
            ),
            follows: FollowsService::new(
                users_repo.clone(),
                bans_repo.clone(),
                follows_repo.clone(),
            ),
            bans: BansService::new(users_repo.clone(), bans_repo.clone(), follows_repo),
            likes: LikesService::new(
                users_repo.clone(),
                bans_repo.clone(),
                likes_repo,
                photos_repo.clone(),
            ),
            comments: CommentsService::new(users_repo, bans_repo, comments_repo, photos_repo),
            db,
            config: Arc::new(config),
            metrics: Metrics::new(),
            auth_cache: AuthCache::new(AUTH_CACHE_CAPACITY),
        }
    }
}
