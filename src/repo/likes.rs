use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::query::{compose, BindValue, Fragment, Relation};
use crate::types::{BaseUser, Like};

use super::{format_db_date, parse_db_date};

#[derive(Clone)]
pub struct LikesRepository {
    pool: SqlitePool,
}

impl LikesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn set_like(
        &self,
        photo_id: i64,
        user_id: i64,
        date: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO likes (photo_id, user_id, date) VALUES (?, ?, ?)")
            .bind(photo_id)
            .bind(user_id)
            .bind(format_db_date(date))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn remove_like(&self, photo_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM likes WHERE photo_id = ? AND user_id = ?")
            .bind(photo_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Lists likes, newest first. Callers include `with_users` so the owner
    /// username is available to the projection.
    pub async fn get_likes(&self, relations: &[Relation]) -> AppResult<Vec<Like>> {
        let q = compose("like", relations);
        let sql = format!(
            r#"SELECT likes.id, likes.photo_id, likes.user_id, username, likes.date FROM likes
            {}
            ORDER BY date DESC"#,
            q.sql
        );
        let rows = q.bind_all(sqlx::query(&sql)).fetch_all(&self.pool).await?;

        let mut likes = Vec::with_capacity(rows.len());
        for row in rows {
            let date: String = row.try_get("date")?;
            likes.push(Like {
                id: row.try_get("id")?,
                date: parse_db_date(&date)?,
                photo_id: row.try_get("photo_id")?,
                owner: BaseUser { id: row.try_get("user_id")?, username: row.try_get("username")? },
            });
        }
        Ok(likes)
    }

    // Relation constructors

    /// Joins per-entity like totals (`total_likes`) onto a listing.
    pub fn with_total_likes() -> Relation {
        Relation::new(|entity| {
            Fragment::join(format!(
                "LEFT JOIN (SELECT {e}_id AS likes_{e}s_id, COUNT(*) AS total_likes FROM likes GROUP BY {e}_id) ON {e}s.id = likes_{e}s_id",
                e = entity
            ))
        })
    }

    /// Joins the set of photos `user_id` liked, exposing
    /// `user_liked_photo_id` for rows the user liked.
    pub fn with_liked_by(user_id: i64) -> Relation {
        Relation::new(move |entity| {
            Fragment::join_with(
                format!(
                    "LEFT JOIN (SELECT photo_id AS user_liked_photo_id FROM likes WHERE user_id = ?) ON {}s.id = user_liked_photo_id",
                    entity
                ),
                vec![BindValue::Int(user_id)],
            )
        })
    }
}
