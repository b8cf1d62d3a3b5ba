//! Finalization: the owner closes an overdue idea, picks a base price, and
//! the engagement-adjusted final price is computed and persisted.

use chrono::Utc;
use serde::Deserialize;

use crate::attachments;
use crate::auth::guard::{authorize, Action, CurrentUser};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::comment;
use crate::models::idea::{self, Idea, IdeaStatus};
use crate::pricing;

/// Body of POST /api/v1/ideas/{id}/finalize.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeRequest {
    pub base_price: i64,
    /// The deliverable text buyers pay for; must be non-empty.
    #[serde(default)]
    pub detail: String,
    /// Appended to the attachments gathered while published.
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Closes an overdue idea. Ownership is re-checked against the freshly
/// loaded row; the closing write is conditional on the row still being
/// overdue, so a concurrent finalize or delete surfaces as an error instead
/// of a double close.
pub async fn finalize(
    pool: &DbPool,
    idea_id: i64,
    user: &CurrentUser,
    req: &FinalizeRequest,
) -> Result<Idea, AppError> {
    let idea = idea::find_by_id(pool, idea_id).await?.ok_or(AppError::NotFound)?;
    authorize(Action::Finalize, Some(user), idea.author_id)?;
    if idea.status != IdeaStatus::Overdue {
        return Err(AppError::InvalidState(format!(
            "idea is {}; only overdue ideas can be finalized",
            idea.status.as_str()
        )));
    }
    if req.detail.trim().is_empty() {
        return Err(AppError::Validation(
            "detail is required at finalization".to_string(),
        ));
    }

    let comment_count = comment::count_for_idea(pool, idea_id).await?;
    let final_price = pricing::compute_final_price(req.base_price, comment_count, idea.is_exclusive)?;
    if final_price < pricing::PRICE_FLOOR {
        return Err(AppError::Validation(format!(
            "final price {} is below the floor of {}",
            final_price,
            pricing::PRICE_FLOOR
        )));
    }

    let merged = attachments::merge(&idea.attachments, &req.attachments);
    let merged = serde_json::to_string(&merged).unwrap_or_else(|_| "[]".to_string());

    let result = sqlx::query(
        "UPDATE ideas SET status = 'closed', base_price = ?2, final_price = ?3, detail = ?4, \
         attachments = ?5, updated_at = ?6 WHERE id = ?1 AND status = 'overdue'",
    )
    .bind(idea_id)
    .bind(req.base_price)
    .bind(final_price)
    .bind(&req.detail)
    .bind(&merged)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return match idea::find_by_id(pool, idea_id).await? {
            Some(current) if current.status != IdeaStatus::Overdue => {
                Err(AppError::InvalidState(format!(
                    "idea is {}; only overdue ideas can be finalized",
                    current.status.as_str()
                )))
            }
            Some(_) => Err(AppError::Conflict("finalize lost a concurrent write".to_string())),
            None => Err(AppError::Conflict("idea was deleted concurrently".to_string())),
        };
    }

    idea::find_by_id(pool, idea_id)
        .await?
        .ok_or_else(|| AppError::Internal("finalized idea not found on re-read".to_string()))
}
