//! Shared test infrastructure.
//!
//! `setup_test_db()` creates a temporary file-backed SQLite database with
//! the full schema applied, plus helpers for the accounts and ideas most
//! tests need.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tempfile::TempDir;

use ideabay::auth::guard::{CurrentUser, Role};
use ideabay::db::{DbPool, MIGRATIONS};
use ideabay::models::idea::{self, Idea, NewIdea};
use ideabay::models::user::{self, NewUser};

/// Holds the temp dir alive for as long as the pool needs the files.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

pub async fn setup_test_db() -> TestDb {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}", db_path.display());

    let options = SqliteConnectOptions::from_str(&url)
        .expect("Failed to parse test DB URL")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .expect("Failed to open test DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb { _dir: dir, pool }
}

/// Insert an account with the given role and return it as the session-level
/// user the guard functions take.
pub async fn create_account(pool: &DbPool, username: &str, role: Role) -> CurrentUser {
    let id = user::create(
        pool,
        &NewUser {
            username: username.to_string(),
            password: "x-not-a-real-hash".to_string(),
            display_name: username.to_string(),
            role,
        },
    )
    .await
    .expect("Failed to create account");
    CurrentUser { id, role }
}

pub async fn member(pool: &DbPool, username: &str) -> CurrentUser {
    create_account(pool, username, Role::Member).await
}

pub async fn admin(pool: &DbPool, username: &str) -> CurrentUser {
    create_account(pool, username, Role::Admin).await
}

/// Publish a plain idea owned by `author`.
pub async fn publish_idea(
    pool: &DbPool,
    author: &CurrentUser,
    title: &str,
    deadline: Option<DateTime<Utc>>,
) -> Idea {
    let new_idea = NewIdea {
        title: title.to_string(),
        summary: format!("Summary for {title}"),
        deadline,
        attachments: Vec::new(),
        is_exclusive: false,
    };
    idea::create(pool, author.id, &new_idea, Utc::now())
        .await
        .expect("Failed to create idea")
}

/// A deadline comfortably in the past.
pub fn past_deadline() -> Option<DateTime<Utc>> {
    Some(Utc::now() - Duration::days(3))
}

/// A deadline comfortably in the future.
pub fn future_deadline() -> Option<DateTime<Utc>> {
    Some(Utc::now() + Duration::days(3))
}
