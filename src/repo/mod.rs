//! Repositories: one per aggregate, each owning its queries and the relation
//! constructors for its tables. Relation constructors are pure and reusable
//! across listing operations; all caller-supplied literals are bound as
//! parameters.

pub mod auth;
pub mod bans;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod photos;
pub mod users;

pub use auth::AuthRepository;
pub use bans::BansRepository;
pub use comments::CommentsRepository;
pub use follows::FollowsRepository;
pub use likes::LikesRepository;
pub use photos::PhotosRepository;
pub use users::UsersRepository;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::AppResult;

/// Dates are stored as RFC 3339 UTC text; lexicographic order equals
/// chronological order, so `ORDER BY ... DESC` over date columns is correct.
pub(crate) fn format_db_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_db_date(value: &str) -> AppResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

pub(crate) const LIKE_ESCAPE: char = '!';

/// Escapes LIKE wildcards in a user-supplied pattern so it matches literally.
pub(crate) fn escape_like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}
