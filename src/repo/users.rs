use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::query::{compose, user_id_column, BindValue, Fragment, Relation};
use crate::types::{BaseUser, FullUser};

use super::escape_like_pattern;

#[derive(Clone)]
pub struct UsersRepository {
    pool: SqlitePool,
}

impl UsersRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_user_by_id(&self, id: i64) -> AppResult<Option<BaseUser>> {
        let row = sqlx::query("SELECT id, username FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                Ok(Some(BaseUser { id: row.try_get("id")?, username: row.try_get("username")? }))
            }
            None => Ok(None),
        }
    }

    pub async fn get_user(&self, relations: &[Relation]) -> AppResult<Option<BaseUser>> {
        let q = compose("user", relations);
        let sql = format!("SELECT users.id, users.username FROM users {}", q.sql);
        let row = q.bind_all(sqlx::query(&sql)).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => {
                Ok(Some(BaseUser { id: row.try_get("id")?, username: row.try_get("username")? }))
            }
            None => Ok(None),
        }
    }

    /// Fetches one user enriched with photo/follower/following totals. The
    /// count columns come from the corresponding `with_total_*` join
    /// relations; missing joins read as zero.
    pub async fn get_full_user(&self, relations: &[Relation]) -> AppResult<Option<FullUser>> {
        let q = compose("user", relations);
        let sql = format!(
            r#"SELECT
                users.id,
                users.username,
                CASE WHEN total_followers IS NULL THEN 0 ELSE total_followers END AS total_followers,
                CASE WHEN total_following IS NULL THEN 0 ELSE total_following END AS total_followings,
                CASE WHEN total_photos IS NULL THEN 0 ELSE total_photos END AS total_photos
            FROM users
            {}
            LIMIT 1"#,
            q.sql
        );
        let row = q.bind_all(sqlx::query(&sql)).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(FullUser {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                total_photos: row.try_get("total_photos")?,
                total_followers: row.try_get("total_followers")?,
                total_followings: row.try_get("total_followings")?,
                banned_for_user: None,
            })),
            None => Ok(None),
        }
    }

    pub async fn get_users(&self, relations: &[Relation]) -> AppResult<Vec<BaseUser>> {
        let q = compose("user", relations);
        let sql = format!("SELECT users.id, users.username FROM users {}", q.sql);
        let rows = q.bind_all(sqlx::query(&sql)).fetch_all(&self.pool).await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(BaseUser { id: row.try_get("id")?, username: row.try_get("username")? });
        }
        Ok(users)
    }

    pub async fn create_user(&self, username: &str) -> AppResult<i64> {
        let result = sqlx::query("INSERT INTO users (username) VALUES (?)")
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn update_username(&self, id: i64, username: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET username = ? WHERE id = ?")
            .bind(username)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Relation constructors

    /// Joins the owning user row onto a query over an entity referencing
    /// users through `user_id`.
    pub fn with_users() -> Relation {
        Relation::new(|entity| {
            Fragment::join(format!("INNER JOIN users ON users.id = {}s.user_id", entity))
        })
    }

    pub fn filter_by_user_id(user_id: i64) -> Relation {
        Relation::new(move |entity| {
            Fragment::filter_with(
                format!("{} = ?", user_id_column(entity)),
                vec![BindValue::Int(user_id)],
            )
        })
    }

    /// Filters by username, either exactly (`strict`) or as an escaped
    /// substring match.
    pub fn filter_by_username(username: &str, strict: bool) -> Relation {
        let username = username.to_string();
        Relation::new(move |_entity| {
            if strict {
                Fragment::filter_with("username = ?", vec![BindValue::Text(username.clone())])
            } else {
                let pattern = format!("%{}%", escape_like_pattern(&username));
                Fragment::filter_with(
                    "username LIKE ? ESCAPE '!'",
                    vec![BindValue::Text(pattern)],
                )
            }
        })
    }
}
