use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::query::{user_id_column, BindValue, Fragment, Relation};

#[derive(Clone)]
pub struct BansRepository {
    pool: SqlitePool,
}

impl BansRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn set_ban(&self, user_id: i64, banned_id: i64) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO user_bans (user_id, banned_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(banned_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn remove_ban(&self, user_id: i64, banned_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM user_bans WHERE user_id = ? AND banned_id = ?")
            .bind(user_id)
            .bind(banned_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Whether `user_id` has banned `target_id` (one direction only).
    pub async fn get_ban_exists(&self, user_id: i64, target_id: i64) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(1) AS cnt FROM user_bans WHERE user_id = ? AND banned_id = ?",
        )
        .bind(user_id)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get::<i64, _>("cnt")? > 0)
    }

    // Relation constructors
    //
    // Banning is one-directional, but its visibility effect is mutual:
    // listings that expose another user's content must compose BOTH
    // directions. Omitting one is a visibility leak, not a crash.

    /// Excludes rows whose counterpart user the actor has banned.
    pub fn without_banned(actor_id: i64) -> Relation {
        Relation::new(move |entity| {
            Fragment::filter_with(
                format!(
                    "{} NOT IN (SELECT banned_id FROM user_bans WHERE user_id = ?)",
                    user_id_column(entity)
                ),
                vec![BindValue::Int(actor_id)],
            )
        })
    }

    /// Excludes rows whose counterpart user has banned the actor.
    pub fn without_banners(actor_id: i64) -> Relation {
        Relation::new(move |entity| {
            Fragment::filter_with(
                format!(
                    "{} NOT IN (SELECT user_id FROM user_bans WHERE banned_id = ?)",
                    user_id_column(entity)
                ),
                vec![BindValue::Int(actor_id)],
            )
        })
    }
}
