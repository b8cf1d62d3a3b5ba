use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub async fn init_pool(database_url: &str) -> DbPool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .expect("Failed to create DB pool")
}

pub async fn run_migrations(pool: &DbPool) {
    sqlx::raw_sql(MIGRATIONS)
        .execute(pool)
        .await
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the initial admin account if the user table is empty.
pub async fn seed_admin(pool: &DbPool, admin_password_hash: &str) {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap_or(0);
    if count > 0 {
        log::info!("Database already seeded ({count} users), skipping admin seed");
        return;
    }

    let result = sqlx::query(
        "INSERT INTO users (username, password, display_name, role, created_at)
         VALUES (?1, ?2, 'Administrator', 'admin', ?3)",
    )
    .bind("admin")
    .bind(admin_password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await;

    match result {
        Ok(_) => log::info!("Seeded initial admin account"),
        Err(e) => log::error!("Admin seed failed: {e}"),
    }
}
