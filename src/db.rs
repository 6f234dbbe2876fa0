use sqlx::SqlitePool;

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Pragmas for better durability/performance
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;

    // Additional tuning (best-effort)
    if let Err(e) = sqlx::query("PRAGMA busy_timeout=10000;").execute(pool).await {
        tracing::warn!("Failed to set busy_timeout: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA temp_store=MEMORY;").execute(pool).await {
        tracing::warn!("Failed to set temp_store: {}", e);
    }

    // users table
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER NOT NULL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE
        )"#,
    )
    .execute(pool)
    .await?;

    // users tokens table
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS user_tokens (
            user_id INTEGER NOT NULL,
            token TEXT NOT NULL,
            UNIQUE(user_id, token),
            PRIMARY KEY(user_id, token),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    // users bans table
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS user_bans (
            user_id INTEGER NOT NULL,
            banned_id INTEGER NOT NULL,
            UNIQUE(user_id, banned_id),
            PRIMARY KEY(user_id, banned_id),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY(banned_id) REFERENCES users(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    // follows table
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS follows (
            follower_id INTEGER NOT NULL,
            following_id INTEGER NOT NULL,
            UNIQUE(follower_id, following_id),
            PRIMARY KEY (following_id, follower_id),
            FOREIGN KEY(follower_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY(following_id) REFERENCES users(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    // photos table
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS photos (
            id INTEGER NOT NULL PRIMARY KEY,
            url TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            upload_date TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    // likes table
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS likes (
            id INTEGER NOT NULL PRIMARY KEY,
            photo_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            UNIQUE(photo_id, user_id),
            FOREIGN KEY(photo_id) REFERENCES photos(id) ON DELETE CASCADE,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    // comments table
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS comments (
            id INTEGER NOT NULL PRIMARY KEY,
            photo_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            content TEXT NOT NULL,
            FOREIGN KEY(photo_id) REFERENCES photos(id) ON DELETE CASCADE,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_photos_user_date", "CREATE INDEX IF NOT EXISTS idx_photos_user_date ON photos(user_id, upload_date DESC)"),
        ("idx_photos_date", "CREATE INDEX IF NOT EXISTS idx_photos_date ON photos(upload_date DESC)"),
        ("idx_likes_photo", "CREATE INDEX IF NOT EXISTS idx_likes_photo ON likes(photo_id)"),
        ("idx_likes_user", "CREATE INDEX IF NOT EXISTS idx_likes_user ON likes(user_id)"),
        ("idx_comments_photo_date", "CREATE INDEX IF NOT EXISTS idx_comments_photo_date ON comments(photo_id, date DESC)"),
        ("idx_follows_follower", "CREATE INDEX IF NOT EXISTS idx_follows_follower ON follows(follower_id)"),
        ("idx_bans_banned", "CREATE INDEX IF NOT EXISTS idx_bans_banned ON user_bans(banned_id)"),
        ("idx_tokens_token", "CREATE INDEX IF NOT EXISTS idx_tokens_token ON user_tokens(token)"),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            // Check if it's a "already exists" error
            match &e {
                sqlx::Error::Database(db_err) => {
                    let msg = db_err.message().to_lowercase();
                    if msg.contains("already exists") || msg.contains("duplicate") {
                        tracing::debug!("Index {} already exists, skipping", name);
                    } else {
                        tracing::warn!("Failed to create index {}: {}", name, e);
                    }
                }
                _ => {
                    tracing::warn!("Failed to create index {}: {}", name, e);
                }
            }
        }
    }

    Ok(())
}
