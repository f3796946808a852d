// ABOUTME: User subscription and billing history storage
// ABOUTME: Current-subscription lookup, trial start, atomic plan replacement, billing ledger

use chrono::{DateTime, Duration, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::types::{BillingRecord, NewBillingRecord, SubscriptionStatus, UserSubscription};
use rentwise_core::{generate_id, TRIAL_DURATION_DAYS};
use rentwise_storage::StorageError;

#[derive(Clone)]
pub struct SubscriptionStorage {
    pool: SqlitePool,
}

impl SubscriptionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The user's active or trial subscription, if any
    pub async fn get_current_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<UserSubscription>, StorageError> {
        debug!("Fetching current subscription for user: {}", user_id);

        sqlx::query_as::<_, UserSubscription>(
            r#"
            SELECT * FROM user_subscriptions
            WHERE user_id = ? AND status IN ('active', 'trial')
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    /// Start a trial on `plan_id` unless the user already has a current
    /// subscription, in which case that one is returned unchanged.
    pub async fn start_trial(
        &self,
        user_id: &str,
        plan_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UserSubscription, StorageError> {
        if let Some(existing) = self.get_current_subscription(user_id).await? {
            debug!(
                "User {} already has subscription {}, not starting trial",
                user_id, existing.id
            );
            return Ok(existing);
        }

        let plan_exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM subscription_plans WHERE id = ? AND is_active = 1")
                .bind(plan_id)
                .fetch_optional(&self.pool)
                .await?;
        if plan_exists.is_none() {
            return Err(StorageError::NotFound(format!("Plan {}", plan_id)));
        }

        let subscription = UserSubscription {
            id: generate_id(),
            user_id: user_id.to_string(),
            plan_id: plan_id.to_string(),
            status: SubscriptionStatus::Trial,
            started_at: now,
            expires_at: Some(now + Duration::days(TRIAL_DURATION_DAYS)),
            properties_used: 0,
            storage_used_mb: 0.0,
            last_billed_at: None,
            next_billing_at: None,
            previous_subscription_id: None,
            effective_at: now,
            created_at: now,
        };

        let mut tx = self.pool.begin().await?;
        insert_subscription(&mut tx, &subscription).await?;
        tx.commit().await?;

        info!("Started {} trial for user {}", plan_id, user_id);
        Ok(subscription)
    }

    /// Swap the user's current subscription for `replacement` atomically.
    ///
    /// The old active/trial row is deleted and the new one inserted in the
    /// same transaction, so a failure leaves the previous row in place.
    pub async fn replace_current_subscription(
        &self,
        replacement: &UserSubscription,
    ) -> Result<(), StorageError> {
        debug!(
            "Replacing current subscription for user {} with plan {}",
            replacement.user_id, replacement.plan_id
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM user_subscriptions WHERE user_id = ? AND status IN ('active', 'trial')",
        )
        .bind(&replacement.user_id)
        .execute(&mut *tx)
        .await?;

        insert_subscription(&mut tx, replacement).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Store a fresh usage snapshot on the current subscription
    pub async fn update_usage_snapshot(
        &self,
        user_id: &str,
        properties_used: i64,
        storage_used_mb: f64,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            UPDATE user_subscriptions
            SET properties_used = ?, storage_used_mb = ?
            WHERE user_id = ? AND status IN ('active', 'trial')
            "#,
        )
        .bind(properties_used)
        .bind(storage_used_mb)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append an entry to the billing ledger
    pub async fn record_billing_event(
        &self,
        record: NewBillingRecord,
    ) -> Result<BillingRecord, StorageError> {
        let record = BillingRecord {
            id: generate_id(),
            user_id: record.user_id,
            subscription_id: record.subscription_id,
            plan_id: record.plan_id,
            amount: record.amount,
            currency: record.currency,
            status: record.status,
            description: record.description,
            billing_period_start: record.billing_period_start,
            billing_period_end: record.billing_period_end,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO billing_history (
                id, user_id, subscription_id, plan_id, amount, currency, status,
                description, billing_period_start, billing_period_end, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.subscription_id)
        .bind(&record.plan_id)
        .bind(record.amount)
        .bind(&record.currency)
        .bind(record.status)
        .bind(&record.description)
        .bind(record.billing_period_start)
        .bind(record.billing_period_end)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(record)
    }

    /// Billing history for a user, newest first
    pub async fn list_billing_history(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<BillingRecord>, StorageError> {
        debug!("Fetching billing history for user: {}", user_id);

        sqlx::query_as::<_, BillingRecord>(
            "SELECT * FROM billing_history WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }
}

async fn insert_subscription(
    tx: &mut Transaction<'_, Sqlite>,
    subscription: &UserSubscription,
) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        INSERT INTO user_subscriptions (
            id, user_id, plan_id, status, started_at, expires_at,
            properties_used, storage_used_mb, last_billed_at, next_billing_at,
            previous_subscription_id, effective_at, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&subscription.id)
    .bind(&subscription.user_id)
    .bind(&subscription.plan_id)
    .bind(subscription.status)
    .bind(subscription.started_at)
    .bind(subscription.expires_at)
    .bind(subscription.properties_used)
    .bind(subscription.storage_used_mb)
    .bind(subscription.last_billed_at)
    .bind(subscription.next_billing_at)
    .bind(&subscription.previous_subscription_id)
    .bind(subscription.effective_at)
    .bind(subscription.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
