use crate::config::PaginationConfig;
use crate::error::{AppError, AppResult};
use crate::types::{BaseUser, PageQuery};

/// Resolves a `{user_id}` path segment: the literal `me` means the
/// authenticated user, anything else must be a valid integer id.
pub fn resolve_user_param(param: &str, actor: &BaseUser) -> AppResult<i64> {
    if param == "me" {
        return Ok(actor.id);
    }
    param
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest("userId should be a valid int number".to_string()))
}

/// Clamps offset/limit to sane bounds before they reach the storage layer:
/// non-negative offset, limit within `1..=max_limit`. Out-of-range values
/// are clamped rather than rejected; the storage layer then simply reads
/// fewer or zero rows.
pub fn clamp_page(query: &PageQuery, cfg: &PaginationConfig) -> (i64, i64) {
    let offset = query.offset.max(0);
    let limit = query.limit.unwrap_or(cfg.default_limit).clamp(1, cfg.max_limit);
    (offset, limit)
}
