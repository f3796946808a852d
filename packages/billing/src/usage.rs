// ABOUTME: Authoritative usage computation from source tables
// ABOUTME: Counts active properties and sums stored file sizes per user

use sqlx::SqlitePool;
use tracing::debug;

use crate::types::UsageStats;
use rentwise_core::bytes_to_mb;
use rentwise_storage::StorageError;

/// Recomputes usage on every call; cached counters are never consulted.
#[derive(Clone)]
pub struct UsageStorage {
    pool: SqlitePool,
}

impl UsageStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of active properties owned by the user
    pub async fn get_current_property_count(&self, user_id: &str) -> Result<i64, StorageError> {
        debug!("Counting active properties for user: {}", user_id);

        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM properties WHERE owner_id = ? AND is_active = 1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    /// Total stored bytes (documents and property images)
    pub async fn calculate_storage_bytes(&self, user_id: &str) -> Result<i64, StorageError> {
        debug!("Summing stored file sizes for user: {}", user_id);

        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT
                COALESCE((SELECT SUM(file_size) FROM documents WHERE owner_id = ?), 0)
              + COALESCE((SELECT SUM(file_size) FROM property_images WHERE owner_id = ?), 0)
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    /// Storage used in MB, rounded to two decimals
    pub async fn calculate_storage_used(&self, user_id: &str) -> Result<f64, StorageError> {
        let bytes = self.calculate_storage_bytes(user_id).await?;
        Ok(bytes_to_mb(bytes))
    }

    pub async fn get_usage_stats(&self, user_id: &str) -> Result<UsageStats, StorageError> {
        let property_count = self.get_current_property_count(user_id).await?;
        let storage_used_mb = self.calculate_storage_used(user_id).await?;

        Ok(UsageStats {
            property_count,
            storage_used_mb,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("../storage/migrations")
            .run(&pool)
            .await
            .unwrap();
        pool
    }

    async fn insert_property(pool: &SqlitePool, id: &str, owner: &str, active: bool) {
        sqlx::query(
            "INSERT INTO properties (id, owner_id, name, address, is_active, created_at, updated_at)
             VALUES (?, ?, 'Unit', '1 Main St', ?, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
        )
        .bind(id)
        .bind(owner)
        .bind(active as i64)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_property_count_ignores_inactive_and_other_owners() {
        let pool = create_test_db().await;
        insert_property(&pool, "p1", "alice", true).await;
        insert_property(&pool, "p2", "alice", true).await;
        insert_property(&pool, "p3", "alice", false).await;
        insert_property(&pool, "p4", "bob", true).await;

        let usage = UsageStorage::new(pool);
        assert_eq!(usage.get_current_property_count("alice").await.unwrap(), 2);
        assert_eq!(usage.get_current_property_count("nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_sums_documents_and_images() {
        let pool = create_test_db().await;
        insert_property(&pool, "p1", "alice", true).await;

        sqlx::query(
            "INSERT INTO documents (id, owner_id, file_name, file_url, file_size, created_at)
             VALUES ('d1', 'alice', 'lease.pdf', 'files/lease.pdf', 1048576, '2025-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO property_images (id, property_id, owner_id, file_name, file_url, file_size, created_at)
             VALUES ('i1', 'p1', 'alice', 'front.jpg', 'files/front.jpg', 524288, '2025-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let usage = UsageStorage::new(pool);
        let stats = usage.get_usage_stats("alice").await.unwrap();
        assert_eq!(stats.property_count, 1);
        assert_eq!(stats.storage_used_mb, 1.5);
        assert_eq!(usage.calculate_storage_used("bob").await.unwrap(), 0.0);
    }
}
