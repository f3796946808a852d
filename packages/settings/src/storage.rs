// ABOUTME: Storage operations for per-user settings
// ABOUTME: Lazy creation with defaults, validated partial updates, and property-count sync

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::SettingsResult;
use crate::types::{UserSettings, UserSettingsUpdate};
use crate::validation::validate_settings_update;
use rentwise_core::{
    DEFAULT_CURRENCY, DEFAULT_QUIET_HOURS_END, DEFAULT_QUIET_HOURS_START,
    DEFAULT_REMINDER_DAYS_BEFORE, DEFAULT_TIMEZONE,
};
use rentwise_storage::StorageError;

#[derive(Clone)]
pub struct SettingsStorage {
    pool: SqlitePool,
}

impl SettingsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get settings for a user, creating the row with defaults on first access
    pub async fn get_user_settings(&self, user_id: &str) -> Result<UserSettings, StorageError> {
        debug!("Fetching settings for user: {}", user_id);

        if let Some(settings) = self.find(user_id).await? {
            return Ok(settings);
        }

        self.insert_defaults(user_id, 0, false).await?;
        info!("Created default settings for user {}", user_id);

        self.find(user_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("Settings for user {}", user_id)))
    }

    /// Apply a partial update after validating every provided field
    pub async fn update_user_settings(
        &self,
        user_id: &str,
        update: &UserSettingsUpdate,
    ) -> SettingsResult<UserSettings> {
        validate_settings_update(update)?;

        // Ensures the row exists
        self.get_user_settings(user_id).await?;

        debug!("Updating settings for user: {}", user_id);
        sqlx::query(
            r#"
            UPDATE user_settings SET
                email_notifications = COALESCE(?, email_notifications),
                sms_notifications = COALESCE(?, sms_notifications),
                push_notifications = COALESCE(?, push_notifications),
                rent_reminders = COALESCE(?, rent_reminders),
                lease_expiry_alerts = COALESCE(?, lease_expiry_alerts),
                maintenance_alerts = COALESCE(?, maintenance_alerts),
                reminder_days_before = COALESCE(?, reminder_days_before),
                quiet_hours_start = COALESCE(?, quiet_hours_start),
                quiet_hours_end = COALESCE(?, quiet_hours_end),
                timezone = COALESCE(?, timezone),
                currency = COALESCE(?, currency),
                updated_at = ?
            WHERE user_id = ?
            "#,
        )
        .bind(update.email_notifications)
        .bind(update.sms_notifications)
        .bind(update.push_notifications)
        .bind(update.rent_reminders)
        .bind(update.lease_expiry_alerts)
        .bind(update.maintenance_alerts)
        .bind(update.reminder_days_before)
        .bind(&update.quiet_hours_start)
        .bind(&update.quiet_hours_end)
        .bind(&update.timezone)
        .bind(&update.currency)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(self.get_user_settings(user_id).await?)
    }

    /// Recount the user's active properties and cache the result, creating
    /// the row with default preferences when the user has none yet.
    pub async fn update_property_count_in_settings(
        &self,
        user_id: &str,
    ) -> Result<i64, StorageError> {
        let property_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM properties WHERE owner_id = ? AND is_active = 1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        debug!(
            "Syncing property count for user {} to {}",
            user_id, property_count
        );

        let updated = sqlx::query(
            "UPDATE user_settings SET property_count = ?, updated_at = ? WHERE user_id = ?",
        )
        .bind(property_count)
        .bind(Utc::now())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            self.insert_defaults(user_id, property_count, true).await?;
        }

        Ok(property_count)
    }

    async fn find(&self, user_id: &str) -> Result<Option<UserSettings>, StorageError> {
        sqlx::query_as::<_, UserSettings>("SELECT * FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }

    /// Insert a default row. When the row already exists, only the property
    /// count is overwritten, and only if `sync_count` is set.
    async fn insert_defaults(
        &self,
        user_id: &str,
        property_count: i64,
        sync_count: bool,
    ) -> Result<(), StorageError> {
        let conflict = if sync_count {
            "DO UPDATE SET property_count = excluded.property_count, updated_at = excluded.updated_at"
        } else {
            "DO NOTHING"
        };
        let sql = format!(
            r#"
            INSERT INTO user_settings (
                user_id, email_notifications, sms_notifications, push_notifications,
                rent_reminders, lease_expiry_alerts, maintenance_alerts,
                reminder_days_before, quiet_hours_start, quiet_hours_end,
                timezone, currency, property_count, created_at, updated_at
            ) VALUES (?, 1, 1, 0, 1, 1, 1, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) {}
            "#,
            conflict
        );

        let now = Utc::now();
        sqlx::query(&sql)
            .bind(user_id)
            .bind(DEFAULT_REMINDER_DAYS_BEFORE)
            .bind(DEFAULT_QUIET_HOURS_START)
            .bind(DEFAULT_QUIET_HOURS_END)
            .bind(DEFAULT_TIMEZONE)
            .bind(DEFAULT_CURRENCY)
            .bind(property_count)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SettingsError;
    use crate::validation::SettingsValidationError;
    use pretty_assertions::assert_eq;

    async fn create_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("../storage/migrations")
            .run(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_lazy_creation_uses_defaults() {
        let storage = SettingsStorage::new(create_test_db().await);

        let settings = storage.get_user_settings("alice").await.unwrap();
        assert!(settings.email_notifications);
        assert!(settings.sms_notifications);
        assert!(!settings.push_notifications);
        assert!(settings.rent_reminders);
        assert!(settings.lease_expiry_alerts);
        assert!(settings.maintenance_alerts);
        assert_eq!(settings.reminder_days_before, 3);
        assert_eq!(settings.quiet_hours_start, "22:00");
        assert_eq!(settings.quiet_hours_end, "08:00");
        assert_eq!(settings.timezone, "Asia/Kolkata");
        assert_eq!(settings.currency, "INR");
        assert_eq!(settings.property_count, 0);

        let again = storage.get_user_settings("alice").await.unwrap();
        assert_eq!(again.created_at, settings.created_at);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let storage = SettingsStorage::new(create_test_db().await);

        let update = UserSettingsUpdate {
            push_notifications: Some(true),
            reminder_days_before: Some(7),
            ..Default::default()
        };
        let settings = storage.update_user_settings("alice", &update).await.unwrap();
        assert!(settings.push_notifications);
        assert_eq!(settings.reminder_days_before, 7);
        assert!(settings.email_notifications);
        assert_eq!(settings.currency, "INR");
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected_without_writing() {
        let storage = SettingsStorage::new(create_test_db().await);

        let update = UserSettingsUpdate {
            email_notifications: Some(false),
            quiet_hours_end: Some("25:00".to_string()),
            ..Default::default()
        };
        let result = storage.update_user_settings("alice", &update).await;
        assert!(matches!(
            result,
            Err(SettingsError::Validation(SettingsValidationError::InvalidTime { .. }))
        ));

        let settings = storage.get_user_settings("alice").await.unwrap();
        assert!(settings.email_notifications);
    }

    async fn insert_property(pool: &SqlitePool, id: &str, active: bool) {
        sqlx::query(
            "INSERT INTO properties (id, owner_id, name, address, is_active, created_at, updated_at)
             VALUES (?, 'alice', 'Unit', '1 Main St', ?, '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
        )
        .bind(id)
        .bind(active)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_property_count_sync_creates_or_updates() {
        let pool = create_test_db().await;
        let storage = SettingsStorage::new(pool.clone());
        for (id, active) in [("p1", true), ("p2", true), ("p3", false)] {
            insert_property(&pool, id, active).await;
        }

        let count = storage
            .update_property_count_in_settings("alice")
            .await
            .unwrap();
        assert_eq!(count, 2);
        let created = storage.get_user_settings("alice").await.unwrap();
        assert_eq!(created.property_count, 2);
        assert_eq!(created.timezone, "Asia/Kolkata");

        sqlx::query("DELETE FROM properties WHERE id = 'p1'")
            .execute(&pool)
            .await
            .unwrap();
        storage
            .update_property_count_in_settings("alice")
            .await
            .unwrap();
        assert_eq!(
            storage.get_user_settings("alice").await.unwrap().property_count,
            1
        );
    }

    #[tokio::test]
    async fn test_property_count_sync_ignores_stale_cache() {
        let pool = create_test_db().await;
        let storage = SettingsStorage::new(pool.clone());
        storage.get_user_settings("alice").await.unwrap();

        sqlx::query("UPDATE user_settings SET property_count = 9 WHERE user_id = 'alice'")
            .execute(&pool)
            .await
            .unwrap();
        insert_property(&pool, "p1", true).await;

        storage
            .update_property_count_in_settings("alice")
            .await
            .unwrap();
        assert_eq!(
            storage.get_user_settings("alice").await.unwrap().property_count,
            1
        );
    }
}
