//! Integration and unit tests for the Lichtbild application.
//!
//! ## Test Modules
//!
//! - **query_tests**: Fragment composition and parameter binding
//! - **workers_tests**: Fan-out aggregator semantics
//! - **pagination_tests**: Paginated response assembly
//! - **media_tests**: Image sniffing and asset storage
//! - **db_tests**: Schema, constraints and cascades
//! - **repo_tests**: Repository queries over a seeded database
//! - **service_tests**: Visibility rules and end-to-end listing scenarios
//! - **api_tests**: Router-level HTTP tests
//! - **config_tests**: Configuration loading and validation
//! - **error_tests**: Error mapping

pub mod api_tests;
pub mod query_tests;

pub(crate) mod support {
    use sqlx::migrate::MigrateDatabase;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use tempfile::{NamedTempFile, TempDir};

    use crate::config::{
        AppConfig, DatabaseConfig, MediaConfig, PaginationConfig, ServerConfig,
    };
    use crate::state::AppState;

    /// Creates a fresh file-backed SQLite database with the full schema.
    /// The returned guard keeps the database file alive for the test.
    pub async fn test_pool() -> (SqlitePool, NamedTempFile) {
        let temp_db = NamedTempFile::new().unwrap();
        let db_url = format!("sqlite:{}", temp_db.path().display());

        sqlx::Sqlite::create_database(&db_url).await.unwrap();

        let pool = SqlitePoolOptions::new().max_connections(1).connect(&db_url).await.unwrap();
        crate::db::init_db(&pool).await.unwrap();

        (pool, temp_db)
    }

    pub fn test_config(db_url: &str, media_dir: &str) -> AppConfig {
        AppConfig {
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 3000 },
            database: DatabaseConfig { url: db_url.to_string(), max_connections: Some(1) },
            media: MediaConfig {
                directory: media_dir.to_string(),
                url_path: "/media".to_string(),
                max_upload_bytes: 10 * 1024 * 1024,
            },
            pagination: PaginationConfig { default_limit: 20, max_limit: 100 },
        }
    }

    /// Full application state over a fresh database and media directory.
    pub async fn test_state() -> (AppState, NamedTempFile, TempDir) {
        let (pool, db_guard) = test_pool().await;
        let media_dir = TempDir::new().unwrap();
        let config = test_config("sqlite::memory:", media_dir.path().to_str().unwrap());
        let state = AppState::new(pool, config);
        (state, db_guard, media_dir)
    }

    pub async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
        sqlx::query("INSERT INTO users (username) VALUES (?)")
            .bind(username)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn seed_photo(pool: &SqlitePool, user_id: i64, url: &str, date: &str) -> i64 {
        sqlx::query("INSERT INTO photos (url, user_id, upload_date) VALUES (?, ?, ?)")
            .bind(url)
            .bind(user_id)
            .bind(date)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn seed_follow(pool: &SqlitePool, follower_id: i64, following_id: i64) {
        sqlx::query("INSERT OR IGNORE INTO follows (follower_id, following_id) VALUES (?, ?)")
            .bind(follower_id)
            .bind(following_id)
            .execute(pool)
            .await
            .unwrap();
    }

    pub async fn seed_like(pool: &SqlitePool, photo_id: i64, user_id: i64, date: &str) {
        sqlx::query("INSERT OR IGNORE INTO likes (photo_id, user_id, date) VALUES (?, ?, ?)")
            .bind(photo_id)
            .bind(user_id)
            .bind(date)
            .execute(pool)
            .await
            .unwrap();
    }

    pub async fn seed_comment(
        pool: &SqlitePool,
        photo_id: i64,
        user_id: i64,
        date: &str,
        content: &str,
    ) {
        sqlx::query("INSERT INTO comments (photo_id, user_id, date, content) VALUES (?, ?, ?, ?)")
            .bind(photo_id)
            .bind(user_id)
            .bind(date)
            .bind(content)
            .execute(pool)
            .await
            .unwrap();
    }
}
