//! Relation fragments and the query composer.
//!
//! Listing queries are assembled from small, independently authored units of
//! query logic ("relations"): a relation is a pure generator that, given the
//! entity name a query is primarily about (`"photo"`, `"user"`, ...),
//! produces either a join fragment or a filter fragment. The composer
//! linearizes an ordered set of relations into one query body, resolving the
//! `WHERE`/`AND` chain among filters, and collects the bound parameter values
//! the fragments carry.
//!
//! Fragments declare their class at construction time (`Fragment::Join` vs
//! `Fragment::Filter`) and hand caller-supplied literals over as
//! [`BindValue`]s next to `?` placeholders; nothing user-controlled is ever
//! rendered into the SQL text itself.

use std::sync::Arc;

use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

/// A parameter value bound positionally onto the final query, in the order
/// the fragments emitted their `?` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Text(String),
}

impl BindValue {
    pub fn bind_to<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            BindValue::Int(value) => query.bind(*value),
            BindValue::Text(value) => query.bind(value.clone()),
        }
    }
}

/// One line of query text plus the values bound by its placeholders.
///
/// A `Filter`'s SQL is the bare predicate; the composer owns the
/// `WHERE`/`AND` introducer. A `Join` is emitted verbatim wherever it
/// appears. Callers order joins before filters, as SQL requires; the
/// composer preserves call order and does not reorder.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Join { sql: String, binds: Vec<BindValue> },
    Filter { predicate: String, binds: Vec<BindValue> },
}

impl Fragment {
    pub fn join(sql: impl Into<String>) -> Self {
        Fragment::Join { sql: sql.into(), binds: Vec::new() }
    }

    pub fn join_with(sql: impl Into<String>, binds: Vec<BindValue>) -> Self {
        Fragment::Join { sql: sql.into(), binds }
    }

    pub fn filter(predicate: impl Into<String>) -> Self {
        Fragment::Filter { predicate: predicate.into(), binds: Vec::new() }
    }

    pub fn filter_with(predicate: impl Into<String>, binds: Vec<BindValue>) -> Self {
        Fragment::Filter { predicate: predicate.into(), binds }
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, Fragment::Filter { .. })
    }
}

/// A composable, reusable generator of query fragments.
///
/// Relations carry no mutable state; the closure is re-evaluated on every
/// compose call with the entity name of the query being built, so one
/// constructor (say, "exclude banned counterparts") serves queries over
/// different primary tables.
#[derive(Clone)]
pub struct Relation {
    build: Arc<dyn Fn(&str) -> Fragment + Send + Sync>,
}

impl Relation {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&str) -> Fragment + Send + Sync + 'static,
    {
        Self { build: Arc::new(build) }
    }

    pub fn apply(&self, entity: &str) -> Fragment {
        (self.build)(entity)
    }
}

/// The linearized query body and its ordered parameter list.
#[derive(Debug, Clone, Default)]
pub struct ComposedQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl ComposedQuery {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Binds this query's parameters onto `query`, in emission order.
    pub fn bind_all<'q>(
        &self,
        mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        for value in &self.binds {
            query = value.bind_to(query);
        }
        query
    }
}

/// Resolves the column referencing a user inside a query over `entity`:
/// the primary key when the query is about users themselves, the foreign key
/// otherwise.
pub fn user_id_column(entity: &str) -> String {
    if entity == "user" {
        "users.id".to_string()
    } else {
        format!("{}s.user_id", entity)
    }
}

/// Linearizes `relations` into one query body bound to `entity`.
///
/// Joins are emitted verbatim in call order. Among filters, the first one
/// encountered introduces the predicate chain with `WHERE` and every later
/// one continues it with `AND`; relative order is preserved and nothing is
/// deduplicated. Zero relations yield an empty body, meaning "no filtering".
pub fn compose(entity: &str, relations: &[Relation]) -> ComposedQuery {
    let mut parts: Vec<String> = Vec::with_capacity(relations.len());
    let mut binds: Vec<BindValue> = Vec::new();
    let mut has_filter = false;

    for relation in relations {
        match relation.apply(entity) {
            Fragment::Join { sql, binds: fragment_binds } => {
                parts.push(sql);
                binds.extend(fragment_binds);
            }
            Fragment::Filter { predicate, binds: fragment_binds } => {
                let introducer = if has_filter {
                    "AND"
                } else {
                    has_filter = true;
                    "WHERE"
                };
                parts.push(format!("{} {}", introducer, predicate));
                binds.extend(fragment_binds);
            }
        }
    }

    ComposedQuery { sql: parts.join(" "), binds }
}
