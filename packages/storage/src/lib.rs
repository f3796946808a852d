// ABOUTME: Data layer and persistence for Rentwise
// ABOUTME: Storage error type, SQLite pool construction, and embedded migrations

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Create a SQLite connection pool for the given database URL
pub async fn create_pool(database_url: &str, max_connections: u32) -> StorageResult<SqlitePool> {
    debug!("Opening database at {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Apply all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_seed_plan_catalog() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscription_plans")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_billing_history_rejects_updates() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO billing_history (id, user_id, amount, status, created_at)
             VALUES ('b1', 'u1', 10.0, 'paid', '2025-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = sqlx::query("UPDATE billing_history SET amount = 0 WHERE id = 'b1'")
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_only_one_current_subscription_per_user() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let insert = "INSERT INTO user_subscriptions (id, user_id, plan_id, status, started_at, effective_at)
                      VALUES (?, 'u1', 'basic', ?, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')";

        sqlx::query(insert)
            .bind("s1")
            .bind("active")
            .execute(&pool)
            .await
            .unwrap();

        let duplicate = sqlx::query(insert)
            .bind("s2")
            .bind("trial")
            .execute(&pool)
            .await;
        assert!(duplicate.is_err());

        // Historical rows do not count against the constraint
        sqlx::query(insert)
            .bind("s3")
            .bind("cancelled")
            .execute(&pool)
            .await
            .unwrap();
    }
}
