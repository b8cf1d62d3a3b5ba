use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::types::{NewUser, User};
use crate::auth::guard::Role;
use crate::db::DbPool;
use crate::errors::AppError;

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    display_name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password: self.password,
            display_name: self.display_name,
            // Unknown role text demotes to member rather than escalating.
            role: Role::parse(&self.role).unwrap_or(Role::Member),
            created_at: self.created_at,
        }
    }
}

pub async fn create(pool: &DbPool, new_user: &NewUser) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO users (username, password, display_name, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&new_user.username)
    .bind(&new_user.password)
    .bind(&new_user.display_name)
    .bind(new_user.role.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password, display_name, role, created_at
         FROM users WHERE username = ?1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserRow::into_user))
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password, display_name, role, created_at
         FROM users WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserRow::into_user))
}

/// True when the username is already taken (registration pre-check).
pub async fn username_exists(pool: &DbPool, username: &str) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?1")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}
