use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::auth::guard::{authorize, Action, CurrentUser};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::idea::types::{AdminIdeaPatch, Idea, IdeaListItem, IdeaPatch, IdeaStatus, NewIdea};

const SELECT_IDEA: &str = "SELECT id, display_number, author_id, title, summary, detail, \
     attachments, deadline, status, base_price, final_price, is_exclusive, \
     purchase_count, created_at, updated_at FROM ideas";

#[derive(FromRow)]
struct IdeaRow {
    id: i64,
    display_number: String,
    author_id: i64,
    title: String,
    summary: String,
    detail: Option<String>,
    attachments: String,
    deadline: Option<DateTime<Utc>>,
    status: String,
    base_price: Option<i64>,
    final_price: Option<i64>,
    is_exclusive: bool,
    purchase_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdeaRow {
    fn into_idea(self) -> Result<Idea, AppError> {
        let status = IdeaStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!("idea {} has unknown status '{}'", self.id, self.status))
        })?;
        // Attachment lists predating the JSON column default decode as empty.
        let attachments: Vec<String> = serde_json::from_str(&self.attachments).unwrap_or_default();
        Ok(Idea {
            id: self.id,
            display_number: self.display_number,
            author_id: self.author_id,
            title: self.title,
            summary: self.summary,
            detail: self.detail,
            attachments,
            deadline: self.deadline,
            status,
            base_price: self.base_price,
            final_price: self.final_price,
            is_exclusive: self.is_exclusive,
            purchase_count: self.purchase_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Claims the next sequence number for the given day and formats the public
/// display number. The upsert makes the claim atomic under concurrent
/// creates; a claimed number that never lands in an idea row just leaves a
/// gap in the day's sequence.
async fn next_display_number(pool: &DbPool, day: &str) -> Result<String, AppError> {
    let seq: i64 = sqlx::query_scalar(
        "INSERT INTO idea_counters (day, next_seq) VALUES (?1, 1) \
         ON CONFLICT(day) DO UPDATE SET next_seq = next_seq + 1 \
         RETURNING next_seq",
    )
    .bind(day)
    .fetch_one(pool)
    .await?;
    Ok(format!("{day}-{seq:03}"))
}

/// Inserts a new idea for `author_id`. Input is assumed validated at the
/// boundary; this only allocates the display number and persists.
pub async fn create(
    pool: &DbPool,
    author_id: i64,
    idea: &NewIdea,
    now: DateTime<Utc>,
) -> Result<Idea, AppError> {
    let day = now.format("%Y%m%d").to_string();
    let display_number = next_display_number(pool, &day).await?;
    let attachments = serde_json::to_string(&idea.attachments).unwrap_or_else(|_| "[]".to_string());

    let result = sqlx::query(
        "INSERT INTO ideas (display_number, author_id, title, summary, attachments, deadline, \
         status, is_exclusive, purchase_count, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'published', ?7, 0, ?8, ?8)",
    )
    .bind(&display_number)
    .bind(author_id)
    .bind(&idea.title)
    .bind(&idea.summary)
    .bind(&attachments)
    .bind(idea.deadline)
    .bind(idea.is_exclusive)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| AppError::Internal("created idea not found on re-read".to_string()))
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Idea>, AppError> {
    let row: Option<IdeaRow> = sqlx::query_as(&format!("{SELECT_IDEA} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(IdeaRow::into_idea).transpose()
}

/// Public catalogue: published ideas only, newest first.
pub async fn find_published(pool: &DbPool) -> Result<Vec<IdeaListItem>, AppError> {
    let rows: Vec<IdeaRow> =
        sqlx::query_as(&format!("{SELECT_IDEA} WHERE status = 'published' ORDER BY created_at DESC, id DESC"))
            .fetch_all(pool)
            .await?;
    collect_list(rows)
}

/// Everything the author owns, regardless of status, newest first.
pub async fn find_by_author(pool: &DbPool, author_id: i64) -> Result<Vec<IdeaListItem>, AppError> {
    let rows: Vec<IdeaRow> =
        sqlx::query_as(&format!("{SELECT_IDEA} WHERE author_id = ?1 ORDER BY created_at DESC, id DESC"))
            .bind(author_id)
            .fetch_all(pool)
            .await?;
    collect_list(rows)
}

fn collect_list(rows: Vec<IdeaRow>) -> Result<Vec<IdeaListItem>, AppError> {
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let idea = row.into_idea()?;
        items.push(IdeaListItem::from(&idea));
    }
    Ok(items)
}

/// Published ideas eligible for the deadline sweep, optionally scoped to one
/// author. Expiry itself is decided in Rust, not in SQL.
pub async fn find_published_for_sweep(
    pool: &DbPool,
    author_id: Option<i64>,
) -> Result<Vec<Idea>, AppError> {
    let rows: Vec<IdeaRow> = match author_id {
        Some(author) => {
            sqlx::query_as(&format!(
                "{SELECT_IDEA} WHERE status = 'published' AND author_id = ?1 ORDER BY id"
            ))
            .bind(author)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(&format!("{SELECT_IDEA} WHERE status = 'published' ORDER BY id"))
                .fetch_all(pool)
                .await?
        }
    };
    rows.into_iter().map(IdeaRow::into_idea).collect()
}

/// Moves a single published idea to overdue. Returns false when the idea was
/// no longer published, which the sweep treats as already handled.
pub async fn mark_overdue(pool: &DbPool, id: i64, now: DateTime<Utc>) -> Result<bool, AppError> {
    let result = sqlx::query(
        "UPDATE ideas SET status = 'overdue', updated_at = ?2 \
         WHERE id = ?1 AND status = 'published'",
    )
    .bind(id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Owner edit. Re-checks ownership against the freshly loaded row so a stale
/// session cannot edit an idea it no longer owns, and only touches rows still
/// in `published`.
pub async fn update(
    pool: &DbPool,
    id: i64,
    patch: &IdeaPatch,
    user: &CurrentUser,
) -> Result<Idea, AppError> {
    let idea = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    authorize(Action::Edit, Some(user), idea.author_id)?;
    if idea.status != IdeaStatus::Published {
        return Err(AppError::InvalidState(format!(
            "idea is {}; only published ideas can be edited",
            idea.status.as_str()
        )));
    }

    let title = patch.title.clone().unwrap_or(idea.title);
    let summary = patch.summary.clone().unwrap_or(idea.summary);
    let deadline = patch.deadline.or(idea.deadline);
    let attachments = patch.attachments.clone().unwrap_or(idea.attachments);
    let attachments = serde_json::to_string(&attachments).unwrap_or_else(|_| "[]".to_string());

    let result = sqlx::query(
        "UPDATE ideas SET title = ?2, summary = ?3, deadline = ?4, attachments = ?5, \
         updated_at = ?6 WHERE id = ?1 AND status = 'published'",
    )
    .bind(id)
    .bind(&title)
    .bind(&summary)
    .bind(deadline)
    .bind(&attachments)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // Lost a race with the sweep or a delete between load and write.
        return match find_by_id(pool, id).await? {
            Some(current) if current.status != IdeaStatus::Published => {
                Err(AppError::InvalidState(format!(
                    "idea is {}; only published ideas can be edited",
                    current.status.as_str()
                )))
            }
            Some(_) => Err(AppError::Conflict("edit lost a concurrent write".to_string())),
            None => Err(AppError::Conflict("idea was deleted concurrently".to_string())),
        };
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Internal("updated idea not found on re-read".to_string()))
}

/// Owner delete; comments go with it via the FK cascade.
pub async fn delete(pool: &DbPool, id: i64, user: &CurrentUser) -> Result<(), AppError> {
    let idea = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;
    authorize(Action::Delete, Some(user), idea.author_id)?;

    let result = sqlx::query("DELETE FROM ideas WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::Conflict("idea was deleted concurrently".to_string()));
    }
    Ok(())
}

/// Administrative override. Caller must already have passed the admin check;
/// ownership is deliberately not consulted. Exclusivity can only be granted
/// here, never revoked.
pub async fn admin_update(
    pool: &DbPool,
    id: i64,
    patch: &AdminIdeaPatch,
) -> Result<Idea, AppError> {
    let idea = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    if patch.is_exclusive == Some(false) && idea.is_exclusive {
        return Err(AppError::Validation(
            "exclusivity cannot be revoked once granted".to_string(),
        ));
    }

    let title = patch.title.clone().unwrap_or(idea.title);
    let summary = patch.summary.clone().unwrap_or(idea.summary);
    let deadline = patch.deadline.or(idea.deadline);
    let status = patch.status.unwrap_or(idea.status);
    let base_price = patch.base_price.or(idea.base_price);
    let final_price = patch.final_price.or(idea.final_price);
    let is_exclusive = patch.is_exclusive.unwrap_or(idea.is_exclusive);

    sqlx::query(
        "UPDATE ideas SET title = ?2, summary = ?3, deadline = ?4, status = ?5, \
         base_price = ?6, final_price = ?7, is_exclusive = ?8, updated_at = ?9 \
         WHERE id = ?1",
    )
    .bind(id)
    .bind(&title)
    .bind(&summary)
    .bind(deadline)
    .bind(status.as_str())
    .bind(base_price)
    .bind(final_price)
    .bind(is_exclusive)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Internal("updated idea not found on re-read".to_string()))
}
