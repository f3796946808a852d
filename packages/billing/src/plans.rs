// ABOUTME: Subscription plan catalog storage
// ABOUTME: Read-only access to the static plan table ordered by price

use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::SubscriptionPlan;
use rentwise_storage::StorageError;

#[derive(Clone)]
pub struct PlanStorage {
    pool: SqlitePool,
}

impl PlanStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List active plans, cheapest first
    pub async fn list_active_plans(&self) -> Result<Vec<SubscriptionPlan>, StorageError> {
        debug!("Fetching active subscription plans");

        let rows = sqlx::query(
            "SELECT * FROM subscription_plans WHERE is_active = 1 ORDER BY price_monthly ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_plan).collect()
    }

    /// Get a plan by id, active or not
    pub async fn get_plan(&self, plan_id: &str) -> Result<Option<SubscriptionPlan>, StorageError> {
        debug!("Fetching subscription plan: {}", plan_id);

        let row = sqlx::query("SELECT * FROM subscription_plans WHERE id = ?")
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_plan).transpose()
    }

    /// Cheapest active plan priced strictly above `price`
    pub async fn next_higher_plan(
        &self,
        price: f64,
    ) -> Result<Option<SubscriptionPlan>, StorageError> {
        let row = sqlx::query(
            r#"
            SELECT * FROM subscription_plans
            WHERE is_active = 1 AND price_monthly > ?
            ORDER BY price_monthly ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(price)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_plan).transpose()
    }
}

fn row_to_plan(row: &sqlx::sqlite::SqliteRow) -> Result<SubscriptionPlan, StorageError> {
    let features: String = row.try_get("features")?;

    Ok(SubscriptionPlan {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price_monthly: row.try_get("price_monthly")?,
        properties_limit: row.try_get("properties_limit")?,
        storage_limit_mb: row.try_get("storage_limit_mb")?,
        features: serde_json::from_str(&features)?,
        is_active: row.try_get::<i64, _>("is_active")? != 0,
    })
}
