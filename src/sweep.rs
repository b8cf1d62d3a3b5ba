//! Deadline sweep: moves published ideas whose deadline has passed into
//! `overdue`. Runs on demand before listings, from the maintenance endpoint,
//! and on a background interval.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::idea::{self, SweptIdea};

/// Pure expiry decision. An absent deadline counts as already expired.
pub fn is_expired(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match deadline {
        None => true,
        Some(d) => d < now,
    }
}

/// Which ideas a sweep run considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepScope {
    /// Every published idea.
    Global,
    /// Only the given author's published ideas.
    Author(i64),
}

/// Report of one sweep run.
#[derive(Debug, Serialize)]
pub struct SweepOutcome {
    pub swept_at: DateTime<Utc>,
    pub updated_count: usize,
    pub updated: Vec<SweptIdea>,
    /// Rows that errored during their individual update; the rest of the
    /// run proceeded.
    pub failed: usize,
}

/// Sweeps expired published ideas to overdue, one row at a time. A row that
/// fails to update is logged and skipped; a row another writer already moved
/// out of `published` is silently dropped from the report.
pub async fn run_sweep(
    pool: &DbPool,
    scope: SweepScope,
    now: DateTime<Utc>,
) -> Result<SweepOutcome, AppError> {
    let author = match scope {
        SweepScope::Global => None,
        SweepScope::Author(id) => Some(id),
    };
    let candidates = idea::find_published_for_sweep(pool, author).await?;

    let mut updated = Vec::new();
    let mut failed = 0usize;
    for candidate in candidates {
        if !is_expired(candidate.deadline, now) {
            continue;
        }
        match idea::mark_overdue(pool, candidate.id, now).await {
            Ok(true) => updated.push(SweptIdea {
                id: candidate.id,
                display_number: candidate.display_number.clone(),
                title: candidate.title.clone(),
                deadline: candidate.deadline,
                author_id: candidate.author_id,
            }),
            Ok(false) => {
                log::debug!(
                    "sweep: idea {} left published before our update; skipping",
                    candidate.id
                );
            }
            Err(e) => {
                log::warn!("sweep: failed to mark idea {} overdue: {}", candidate.id, e);
                failed += 1;
            }
        }
    }

    if !updated.is_empty() || failed > 0 {
        log::info!(
            "deadline sweep moved {} idea(s) to overdue ({} failed)",
            updated.len(),
            failed
        );
    }

    Ok(SweepOutcome { swept_at: now, updated_count: updated.len(), updated, failed })
}

/// Background sweep loop on a fixed interval.
pub fn spawn_sweep_scheduler(pool: DbPool, every: Duration) {
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            log::debug!("running scheduled deadline sweep");
            if let Err(e) = run_sweep(&pool, SweepScope::Global, Utc::now()).await {
                log::error!("scheduled deadline sweep failed: {}", e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn missing_deadline_is_expired() {
        assert!(is_expired(None, at(2025, 6, 1, 12)));
    }

    #[test]
    fn past_deadline_is_expired() {
        assert!(is_expired(Some(at(2025, 5, 31, 12)), at(2025, 6, 1, 12)));
    }

    #[test]
    fn future_deadline_is_not_expired() {
        assert!(!is_expired(Some(at(2025, 6, 2, 12)), at(2025, 6, 1, 12)));
    }

    #[test]
    fn deadline_equal_to_now_is_not_expired() {
        let t = at(2025, 6, 1, 12);
        assert!(!is_expired(Some(t), t));
    }
}
