//! Exclusive-contract grant. Admin-only, closed ideas only, and one-way:
//! once exclusive, always exclusive.

use chrono::Utc;

use crate::auth::guard::{authorize, Action, CurrentUser};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::idea::{self, Idea, IdeaStatus};

/// Marks a closed idea as under exclusive contract. Fails on ideas that are
/// not closed and on ideas already under contract.
pub async fn grant_exclusive(
    pool: &DbPool,
    idea_id: i64,
    user: &CurrentUser,
) -> Result<Idea, AppError> {
    let idea = idea::find_by_id(pool, idea_id).await?.ok_or(AppError::NotFound)?;
    authorize(Action::AdminOverride, Some(user), idea.author_id)?;
    if idea.status != IdeaStatus::Closed {
        return Err(AppError::InvalidState(format!(
            "idea is {}; exclusivity is granted on closed ideas only",
            idea.status.as_str()
        )));
    }
    if idea.is_exclusive {
        return Err(AppError::InvalidState(
            "idea is already under an exclusive contract".to_string(),
        ));
    }

    let result = sqlx::query(
        "UPDATE ideas SET is_exclusive = 1, updated_at = ?2 \
         WHERE id = ?1 AND status = 'closed' AND is_exclusive = 0",
    )
    .bind(idea_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return match idea::find_by_id(pool, idea_id).await? {
            Some(current) if current.is_exclusive => Err(AppError::InvalidState(
                "idea is already under an exclusive contract".to_string(),
            )),
            Some(current) => Err(AppError::InvalidState(format!(
                "idea is {}; exclusivity is granted on closed ideas only",
                current.status.as_str()
            ))),
            None => Err(AppError::Conflict("idea was deleted concurrently".to_string())),
        };
    }

    idea::find_by_id(pool, idea_id)
        .await?
        .ok_or_else(|| AppError::Internal("idea not found on re-read".to_string()))
}
