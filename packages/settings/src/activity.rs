// ABOUTME: Append-only login activity ledger
// ABOUTME: Records sign-in events and lists them newest first

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::types::{LoginActivity, NewLoginActivity};
use rentwise_core::generate_id;
use rentwise_storage::StorageError;

#[derive(Clone)]
pub struct LoginActivityStorage {
    pool: SqlitePool,
}

impl LoginActivityStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record_login_activity(
        &self,
        activity: NewLoginActivity,
    ) -> Result<LoginActivity, StorageError> {
        let activity = LoginActivity {
            id: generate_id(),
            user_id: activity.user_id,
            event: activity.event,
            ip_address: activity.ip_address,
            user_agent: activity.user_agent,
            success: activity.success,
            created_at: Utc::now(),
        };

        debug!(
            "Recording {:?} for user {}",
            activity.event, activity.user_id
        );

        sqlx::query(
            r#"
            INSERT INTO login_activity (id, user_id, event, ip_address, user_agent, success, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&activity.id)
        .bind(&activity.user_id)
        .bind(activity.event)
        .bind(&activity.ip_address)
        .bind(&activity.user_agent)
        .bind(activity.success)
        .bind(activity.created_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(activity)
    }

    pub async fn list_login_activity(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<LoginActivity>, StorageError> {
        debug!("Fetching login activity for user: {}", user_id);

        sqlx::query_as::<_, LoginActivity>(
            "SELECT * FROM login_activity WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }
}
