use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::comment::types::Comment;
use crate::models::idea;
use crate::models::idea::IdeaStatus;

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    idea_id: i64,
    author_id: i64,
    body: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            idea_id: self.idea_id,
            author_id: self.author_id,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

/// Attaches a comment to a published idea. Overdue and closed ideas no
/// longer take feedback, so anything else is an invalid-state error.
pub async fn create(
    pool: &DbPool,
    idea_id: i64,
    author_id: i64,
    body: &str,
) -> Result<Comment, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("comment text must not be empty".to_string()));
    }

    let idea = idea::find_by_id(pool, idea_id).await?.ok_or(AppError::NotFound)?;
    if idea.status != IdeaStatus::Published {
        return Err(AppError::InvalidState(format!(
            "idea is {}; comments are only accepted while published",
            idea.status.as_str()
        )));
    }

    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO comments (idea_id, author_id, body, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(idea_id)
    .bind(author_id)
    .bind(body)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Comment {
        id: result.last_insert_rowid(),
        idea_id,
        author_id,
        body: body.to_string(),
        created_at: now,
    })
}

/// Comments for one idea, oldest first.
pub async fn find_by_idea(pool: &DbPool, idea_id: i64) -> Result<Vec<Comment>, AppError> {
    let rows: Vec<CommentRow> = sqlx::query_as(
        "SELECT id, idea_id, author_id, body, created_at FROM comments \
         WHERE idea_id = ?1 ORDER BY created_at ASC, id ASC",
    )
    .bind(idea_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(CommentRow::into_comment).collect())
}

/// Exact comment count; the pricing formula consumes this at finalization.
pub async fn count_for_idea(pool: &DbPool, idea_id: i64) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE idea_id = ?1")
        .bind(idea_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
