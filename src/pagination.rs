//! Pagination assembly: merges the entries page and the total count produced
//! by a two-job fan-out into one response envelope.
//!
//! The page and the count are independent snapshot reads sharing the same
//! visibility filters but no transaction; under concurrent writes between
//! the two sub-queries, `total_count` may not exactly equal the sum of all
//! page lengths. This is accepted (eventually-consistent pagination), not an
//! error.

use crate::error::{AppError, AppResult};
use crate::types::PaginatedPhotos;
use crate::workers::{JobOutput, Work};

/// Tag of the job producing the page of entries.
pub const ENTRIES_JOB: usize = 0;
/// Tag of the job producing the total count.
pub const COUNT_JOB: usize = 1;

/// Merges the collected work items of a listing fan-out into a
/// [`PaginatedPhotos`].
///
/// Items are correlated by tag ([`ENTRIES_JOB`], [`COUNT_JOB`]), never by
/// arrival order. The first failed item encountered propagates and the other
/// result is discarded. An absent or empty entries payload normalizes to an
/// empty vector. Offset/limit bounds are clamped by the HTTP layer before
/// the queries run; out-of-range values simply read fewer or zero rows,
/// which is reported as-is.
pub fn assemble(offset: i64, limit: i64, works: Vec<Work>) -> AppResult<PaginatedPhotos> {
    let mut entries: Option<Vec<crate::types::Photo>> = None;
    let mut total_count = 0i64;

    for work in works {
        match (work.idx, work.result?) {
            (ENTRIES_JOB, JobOutput::Photos(photos)) => entries = Some(photos),
            (COUNT_JOB, JobOutput::Count(count)) => total_count = count,
            (idx, output) => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "unexpected output {:?} for job {}",
                    output,
                    idx
                )))
            }
        }
    }

    Ok(PaginatedPhotos { offset, limit, entries: entries.unwrap_or_default(), total_count })
}
