// ABOUTME: Self-service account deletion
// ABOUTME: Removes every row a user owns across all per-user tables in one transaction

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{AuthError, AuthResult};

/// Per-user tables and their owner column, children before parents
const OWNED_TABLES: &[(&str, &str)] = &[
    ("notifications", "user_id"),
    ("leases", "owner_id"),
    ("tenants", "owner_id"),
    ("property_images", "owner_id"),
    ("documents", "owner_id"),
    ("properties", "owner_id"),
    ("billing_history", "user_id"),
    ("user_subscriptions", "user_id"),
    ("login_activity", "user_id"),
    ("data_export_requests", "user_id"),
    ("user_settings", "user_id"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSummary {
    pub user_id: String,
    pub rows_deleted: u64,
}

#[derive(Clone)]
pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Delete everything owned by `target_user_id`. Only the account owner
    /// may do this; any other caller gets `Forbidden` and nothing changes.
    pub async fn delete_account(
        &self,
        caller_id: &str,
        target_user_id: &str,
    ) -> AuthResult<DeletionSummary> {
        if target_user_id.trim().is_empty() {
            return Err(AuthError::InvalidInput("User id is required".to_string()));
        }
        if caller_id != target_user_id {
            warn!(
                "User {} attempted to delete account {}",
                caller_id, target_user_id
            );
            return Err(AuthError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        let mut rows_deleted = 0;

        for (table, owner_column) in OWNED_TABLES {
            let sql = format!("DELETE FROM {} WHERE {} = ?", table, owner_column);
            let result = sqlx::query(&sql)
                .bind(target_user_id)
                .execute(&mut *tx)
                .await?;
            rows_deleted += result.rows_affected();
        }

        tx.commit().await?;

        info!(
            "Deleted account {} ({} rows removed)",
            target_user_id, rows_deleted
        );
        Ok(DeletionSummary {
            user_id: target_user_id.to_string(),
            rows_deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn create_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("../storage/migrations")
            .run(&pool)
            .await
            .unwrap();
        pool
    }

    async fn seed_user(pool: &SqlitePool, user: &str) {
        let property_id = format!("{}-home", user);
        sqlx::query("INSERT INTO user_settings (user_id) VALUES (?)")
            .bind(user)
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO properties (id, owner_id, name, address, created_at, updated_at)
             VALUES (?, ?, 'Home', '1 Main St', '2025-01-01T00:00:00+00:00', '2025-01-01T00:00:00+00:00')",
        )
        .bind(&property_id)
        .bind(user)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO leases (id, owner_id, property_id, start_date, end_date, monthly_rent, created_at)
             VALUES (?, ?, ?, '2025-01-01', '2025-12-31', 10000, '2025-01-01T00:00:00+00:00')",
        )
        .bind(format!("{}-lease", user))
        .bind(user)
        .bind(&property_id)
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO billing_history (id, user_id, amount, status, created_at)
             VALUES (?, ?, 499, 'paid', '2025-01-01T00:00:00+00:00')",
        )
        .bind(format!("{}-bill", user))
        .bind(user)
        .execute(pool)
        .await
        .unwrap();
    }

    async fn owned_rows(pool: &SqlitePool, user: &str) -> i64 {
        let mut total = 0;
        for (table, column) in OWNED_TABLES {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", table, column);
            let count: i64 = sqlx::query_scalar(&sql)
                .bind(user)
                .fetch_one(pool)
                .await
                .unwrap();
            total += count;
        }
        total
    }

    #[tokio::test]
    async fn test_delete_own_account() {
        let pool = create_test_db().await;
        seed_user(&pool, "alice").await;
        seed_user(&pool, "bob").await;

        let summary = AccountService::new(pool.clone())
            .delete_account("alice", "alice")
            .await
            .unwrap();
        assert_eq!(summary.rows_deleted, 4);
        assert_eq!(owned_rows(&pool, "alice").await, 0);
        assert_eq!(owned_rows(&pool, "bob").await, 4);
    }

    #[tokio::test]
    async fn test_cannot_delete_someone_else() {
        let pool = create_test_db().await;
        seed_user(&pool, "bob").await;

        let result = AccountService::new(pool.clone())
            .delete_account("alice", "bob")
            .await;
        assert!(matches!(result, Err(AuthError::Forbidden)));
        assert_eq!(owned_rows(&pool, "bob").await, 4);
    }
}
