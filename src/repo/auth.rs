use sqlx::{Row, SqlitePool};

use crate::error::AppResult;
use crate::query::{compose, BindValue, Fragment, Relation};

#[derive(Clone)]
pub struct AuthRepository {
    pool: SqlitePool,
}

impl AuthRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_token(&self, relations: &[Relation]) -> AppResult<Option<String>> {
        let q = compose("user_token", relations);
        let sql = format!("SELECT token FROM user_tokens {}", q.sql);
        let row = q.bind_all(sqlx::query(&sql)).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(row.try_get("token")?)),
            None => Ok(None),
        }
    }

    pub async fn set_token(&self, user_id: i64, token: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO user_tokens (token, user_id) VALUES (?, ?)")
            .bind(token)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Relation constructors

    /// Joins the token table onto a query over users.
    pub fn with_tokens() -> Relation {
        Relation::new(|entity| {
            Fragment::join(format!("INNER JOIN user_tokens ON {e}s.id = {e}_id", e = entity))
        })
    }

    pub fn filter_by_token(token: &str) -> Relation {
        let token = token.to_string();
        Relation::new(move |_entity| {
            Fragment::filter_with("token = ?", vec![BindValue::Text(token.clone())])
        })
    }
}
