use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::query::{user_id_column, BindValue, Fragment, Relation};

#[derive(Clone)]
pub struct FollowsRepository {
    pool: SqlitePool,
}

impl FollowsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn set_follow(&self, follower_id: i64, following_id: i64) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO follows (follower_id, following_id) VALUES (?, ?)")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn remove_follow(&self, follower_id: i64, following_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
            .bind(follower_id)
            .bind(following_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Relation constructors

    /// Limits a listing to entities owned by users that `follower_id`
    /// follows.
    pub fn filter_by_follower_id(follower_id: i64) -> Relation {
        Relation::new(move |entity| {
            Fragment::join_with(
                format!(
                    "INNER JOIN (SELECT following_id FROM follows WHERE follower_id = ?) ON following_id = {}",
                    user_id_column(entity)
                ),
                vec![BindValue::Int(follower_id)],
            )
        })
    }

    /// Limits a listing to entities owned by users following `following_id`.
    pub fn filter_by_following_id(following_id: i64) -> Relation {
        Relation::new(move |entity| {
            Fragment::join_with(
                format!(
                    "INNER JOIN (SELECT follower_id FROM follows WHERE following_id = ?) ON follower_id = {}",
                    user_id_column(entity)
                ),
                vec![BindValue::Int(following_id)],
            )
        })
    }

    pub fn with_total_followers() -> Relation {
        Relation::new(|entity| {
            Fragment::join(format!(
                "LEFT JOIN (SELECT following_id, COUNT(*) AS total_followers FROM follows GROUP BY following_id) ON {}s.id = following_id",
                entity
            ))
        })
    }

    pub fn with_total_followings() -> Relation {
        Relation::new(|entity| {
            Fragment::join(format!(
                "LEFT JOIN (SELECT follower_id, COUNT(*) AS total_following FROM follows GROUP BY follower_id) ON {}s.id = follower_id",
                entity
            ))
        })
    }
}
