use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::query::{compose, BindValue, Fragment, Relation};
use crate::types::{BaseUser, Photo};

use super::{format_db_date, parse_db_date};

#[derive(Clone)]
pub struct PhotosRepository {
    pool: SqlitePool,
}

impl PhotosRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_photo_by_id(&self, photo_id: i64) -> AppResult<Option<Photo>> {
        let row = sqlx::query(
            r#"SELECT photos.id, url, user_id, users.username, upload_date FROM photos
            INNER JOIN users ON users.id = user_id
            WHERE photos.id = ?"#,
        )
        .bind(photo_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let upload_date: String = row.try_get("upload_date")?;
                Ok(Some(Photo {
                    id: row.try_get("id")?,
                    url: row.try_get("url")?,
                    upload_date: parse_db_date(&upload_date)?,
                    owner: BaseUser {
                        id: row.try_get("user_id")?,
                        username: row.try_get("username")?,
                    },
                    total_likes: 0,
                    total_comments: 0,
                    user_liked: false,
                }))
            }
            None => Ok(None),
        }
    }

    /// Fetches one page of photos, newest first.
    ///
    /// Callers must include the `with_users`, `with_total_likes`,
    /// `with_total_comments` and `with_liked_by` relations; the projection
    /// references the columns those joins provide.
    pub async fn get_photos(
        &self,
        offset: i64,
        limit: i64,
        relations: &[Relation],
    ) -> AppResult<Vec<Photo>> {
        let q = compose("photo", relations);
        let sql = format!(
            r#"SELECT
                photos.id,
                url,
                user_id,
                users.username,
                upload_date,
                CASE WHEN total_likes IS NULL THEN 0 ELSE total_likes END AS total_likes,
                CASE WHEN total_comments IS NULL THEN 0 ELSE total_comments END AS total_comments,
                CASE WHEN user_liked_photo_id IS NULL THEN 0 ELSE 1 END AS user_liked_photo
            FROM photos
            {}
            ORDER BY upload_date DESC
            LIMIT ? OFFSET ?"#,
            q.sql
        );
        let rows = q
            .bind_all(sqlx::query(&sql))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let mut photos = Vec::with_capacity(rows.len());
        for row in rows {
            let upload_date: String = row.try_get("upload_date")?;
            photos.push(Photo {
                id: row.try_get("id")?,
                url: row.try_get("url")?,
                upload_date: parse_db_date(&upload_date)?,
                owner: BaseUser { id: row.try_get("user_id")?, username: row.try_get("username")? },
                total_likes: row.try_get("total_likes")?,
                total_comments: row.try_get("total_comments")?,
                user_liked: row.try_get::<i64, _>("user_liked_photo")? != 0,
            });
        }
        Ok(photos)
    }

    /// Counts photos under the same visibility filters a page was built with.
    pub async fn get_photos_count(&self, relations: &[Relation]) -> AppResult<i64> {
        let q = compose("photo", relations);
        let sql = format!("SELECT COUNT(*) AS cnt FROM photos {}", q.sql);
        let row = q.bind_all(sqlx::query(&sql)).fetch_one(&self.pool).await?;
        Ok(row.try_get("cnt")?)
    }

    pub async fn set_photo(
        &self,
        url: &str,
        user_id: i64,
        date: DateTime<Utc>,
    ) -> AppResult<i64> {
        let result = sqlx::query("INSERT INTO photos (url, user_id, upload_date) VALUES (?, ?, ?)")
            .bind(url)
            .bind(user_id)
            .bind(format_db_date(date))
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn remove_photo(&self, photo_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM photos WHERE id = ?").bind(photo_id).execute(&self.pool).await?;
        Ok(())
    }

    // Relation constructors

    /// Joins per-user photo totals onto a query over users.
    pub fn with_total_photos() -> Relation {
        Relation::new(|entity| {
            Fragment::join(format!(
                "LEFT JOIN (SELECT user_id, COUNT(*) AS total_photos FROM photos GROUP BY user_id) ON {}s.id = user_id",
                entity
            ))
        })
    }

    pub fn filter_by_photo_id(photo_id: i64) -> Relation {
        Relation::new(move |entity| {
            if entity == "photo" {
                Fragment::filter_with("photos.id = ?", vec![BindValue::Int(photo_id)])
            } else {
                Fragment::filter_with(
                    format!("{}s.photo_id = ?", entity),
                    vec![BindValue::Int(photo_id)],
                )
            }
        })
    }
}
