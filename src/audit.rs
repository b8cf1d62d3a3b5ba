//! Append-only audit trail for lifecycle and administrative actions.
//!
//! Call sites treat audit failures as non-fatal: the action already
//! happened, so a write error is logged and swallowed with `let _ =`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub target_type: String,
    pub target_id: i64,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct AuditRow {
    id: i64,
    user_id: i64,
    action: String,
    target_type: String,
    target_id: i64,
    details: String,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> AuditEntry {
        AuditEntry {
            id: self.id,
            user_id: self.user_id,
            action: self.action,
            target_type: self.target_type,
            target_id: self.target_id,
            details: serde_json::from_str(&self.details).unwrap_or(Value::Null),
            created_at: self.created_at,
        }
    }
}

pub async fn log(
    pool: &DbPool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), AppError> {
    let details = serde_json::to_string(&details).unwrap_or_else(|_| "{}".to_string());
    sqlx::query(
        "INSERT INTO audit_entries (user_id, action, target_type, target_id, details, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(&details)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recent entries first, for the admin review endpoint.
pub async fn find_recent(pool: &DbPool, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
    let rows: Vec<AuditRow> = sqlx::query_as(
        "SELECT id, user_id, action, target_type, target_id, details, created_at \
         FROM audit_entries ORDER BY created_at DESC, id DESC LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(AuditRow::into_entry).collect())
}
