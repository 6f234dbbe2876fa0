use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::query::{compose, BindValue, Fragment, Relation};
use crate::types::{BaseUser, Comment};

use super::{format_db_date, parse_db_date};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: SqlitePool,
}

impl CommentsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_comment_by_id(
        &self,
        comment_id: i64,
        relations: &[Relation],
    ) -> AppResult<Option<Comment>> {
        let mut relations = relations.to_vec();
        relations.push(Self::filter_by_comment_id(comment_id));
        let q = compose("comment", &relations);
        let sql = format!(
            "SELECT comments.id, photo_id, user_id, username, date, content FROM comments {}",
            q.sql
        );
        let row = q.bind_all(sqlx::query(&sql)).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let date: String = row.try_get("date")?;
                Ok(Some(Comment {
                    id: row.try_get("id")?,
                    date: parse_db_date(&date)?,
                    content: row.try_get("content")?,
                    photo_id: row.try_get("photo_id")?,
                    owner: BaseUser {
                        id: row.try_get("user_id")?,
                        username: row.try_get("username")?,
                    },
                }))
            }
            None => Ok(None),
        }
    }

    /// Lists comments, newest first. Callers include `with_users` so the
    /// owner username is available to the projection.
    pub async fn get_comments(&self, relations: &[Relation]) -> AppResult<Vec<Comment>> {
        let q = compose("comment", relations);
        let sql = format!(
            r#"SELECT
                comments.id,
                comments.photo_id,
                comments.user_id,
                username,
                comments.date,
                comments.content
            FROM comments
            {}
            ORDER BY comments.date DESC"#,
            q.sql
        );
        let rows = q.bind_all(sqlx::query(&sql)).fetch_all(&self.pool).await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            let date: String = row.try_get("date")?;
            comments.push(Comment {
                id: row.try_get("id")?,
                date: parse_db_date(&date)?,
                content: row.try_get("content")?,
                photo_id: row.try_get("photo_id")?,
                owner: BaseUser { id: row.try_get("user_id")?, username: row.try_get("username")? },
            });
        }
        Ok(comments)
    }

    pub async fn set_comment(
        &self,
        photo_id: i64,
        user_id: i64,
        date: DateTime<Utc>,
        content: &str,
    ) -> AppResult<i64> {
        let result =
            sqlx::query("INSERT INTO comments (photo_id, user_id, date, content) VALUES (?, ?, ?, ?)")
                .bind(photo_id)
                .bind(user_id)
                .bind(format_db_date(date))
                .bind(content)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn remove_comment(&self, comment_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Relation constructors

    /// Joins per-entity comment totals (`total_comments`) onto a listing.
    pub fn with_total_comments() -> Relation {
        Relation::new(|entity| {
            Fragment::join(format!(
                "LEFT JOIN (SELECT {e}_id AS comments_{e}s_id, COUNT(*) AS total_comments FROM comments GROUP BY {e}_id) ON {e}s.id = comments_{e}s_id",
                e = entity
            ))
        })
    }

    pub fn filter_by_comment_id(comment_id: i64) -> Relation {
        Relation::new(move |entity| {
            if entity == "comment" {
                Fragment::filter_with("comments.id = ?", vec![BindValue::Int(comment_id)])
            } else {
                Fragment::filter_with(
                    format!("{}s.comment_id = ?", entity),
                    vec![BindValue::Int(comment_id)],
                )
            }
        })
    }
}
