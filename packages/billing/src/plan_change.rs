// ABOUTME: Subscription plan-change workflow and plan comparison
// ABOUTME: Validates current usage against the target plan before swapping subscriptions

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::plans::PlanStorage;
use crate::subscriptions::SubscriptionStorage;
use crate::types::{
    BillingStatus, NewBillingRecord, PlanChangeOutcome, PlanComparison, SubscriptionPlan,
    SubscriptionStatus, UserSubscription,
};
use crate::usage::UsageStorage;
use rentwise_core::constants::BILLING_CYCLE_DAYS;
use rentwise_core::{bytes_to_mb, generate_id, DEFAULT_CURRENCY};
use rentwise_storage::StorageError;

#[derive(Debug, Error)]
pub enum PlanChangeError {
    #[error("Plan not found")]
    PlanNotFound,

    #[error("You are already on this plan")]
    SamePlan,

    #[error("You have {current} properties, but the {plan} plan allows only {limit}. Please remove {excess} properties before downgrading.")]
    PropertyLimitExceeded {
        plan: String,
        current: i64,
        limit: i64,
        excess: i64,
    },

    #[error("You are using {used_mb} MB of storage, but the {plan} plan allows only {limit_mb} MB. Please delete files to free up {excess_mb} MB before downgrading.")]
    StorageLimitExceeded {
        plan: String,
        used_mb: f64,
        limit_mb: i64,
        excess_mb: f64,
    },

    #[error("Failed to change plan: {0}")]
    Storage(#[from] StorageError),
}

/// Pure price comparison between two plans
pub fn compare_plans(current: &SubscriptionPlan, target: &SubscriptionPlan) -> PlanComparison {
    let is_same_plan = current.id == target.id;
    PlanComparison {
        is_upgrade: !is_same_plan && target.price_monthly > current.price_monthly,
        is_downgrade: !is_same_plan && target.price_monthly < current.price_monthly,
        is_same_plan,
        price_difference: target.price_monthly - current.price_monthly,
    }
}

#[derive(Clone)]
pub struct PlanChangeService {
    plans: PlanStorage,
    subscriptions: SubscriptionStorage,
    usage: UsageStorage,
}

impl PlanChangeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            plans: PlanStorage::new(pool.clone()),
            subscriptions: SubscriptionStorage::new(pool.clone()),
            usage: UsageStorage::new(pool),
        }
    }

    pub async fn change_subscription_plan(
        &self,
        user_id: &str,
        new_plan_id: &str,
    ) -> PlanChangeOutcome {
        self.change_subscription_plan_at(user_id, new_plan_id, Utc::now())
            .await
    }

    /// Move the user onto `new_plan_id`. Never fails: every error is
    /// reported through the outcome's message.
    pub async fn change_subscription_plan_at(
        &self,
        user_id: &str,
        new_plan_id: &str,
        now: DateTime<Utc>,
    ) -> PlanChangeOutcome {
        match self.try_change_plan(user_id, new_plan_id, now).await {
            Ok((subscription, plan)) => PlanChangeOutcome {
                success: true,
                message: format!("Successfully changed to the {} plan", plan.name),
                subscription: Some(subscription),
            },
            Err(e) => {
                match &e {
                    PlanChangeError::Storage(inner) => {
                        error!("Plan change for user {} failed: {}", user_id, inner)
                    }
                    other => info!("Plan change for user {} rejected: {}", user_id, other),
                }
                PlanChangeOutcome {
                    success: false,
                    message: e.to_string(),
                    subscription: None,
                }
            }
        }
    }

    async fn try_change_plan(
        &self,
        user_id: &str,
        new_plan_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(UserSubscription, SubscriptionPlan), PlanChangeError> {
        let plan = self
            .plans
            .get_plan(new_plan_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(PlanChangeError::PlanNotFound)?;

        let current = self.subscriptions.get_current_subscription(user_id).await?;
        if let Some(current) = &current {
            if current.plan_id == new_plan_id {
                return Err(PlanChangeError::SamePlan);
            }
        }

        let property_count = self.usage.get_current_property_count(user_id).await?;
        let storage_used_bytes = self.usage.calculate_storage_bytes(user_id).await?;
        let storage_used_mb = bytes_to_mb(storage_used_bytes);

        if !plan.has_unlimited_properties() && property_count > plan.properties_limit {
            return Err(PlanChangeError::PropertyLimitExceeded {
                plan: plan.name.clone(),
                current: property_count,
                limit: plan.properties_limit,
                excess: property_count - plan.properties_limit,
            });
        }

        if let Some(limit_bytes) = plan.storage_limit_bytes() {
            if storage_used_bytes > limit_bytes {
                return Err(PlanChangeError::StorageLimitExceeded {
                    plan: plan.name.clone(),
                    used_mb: storage_used_mb,
                    limit_mb: plan.storage_limit_mb,
                    // Never report zero excess for a refused downgrade
                    excess_mb: bytes_to_mb(storage_used_bytes - limit_bytes).max(0.01),
                });
            }
        }

        let next_billing_at = now + Duration::days(BILLING_CYCLE_DAYS);
        let subscription = UserSubscription {
            id: generate_id(),
            user_id: user_id.to_string(),
            plan_id: plan.id.clone(),
            status: SubscriptionStatus::Active,
            started_at: now,
            expires_at: None,
            properties_used: property_count,
            storage_used_mb,
            last_billed_at: Some(now),
            next_billing_at: Some(next_billing_at),
            previous_subscription_id: current.as_ref().map(|c| c.id.clone()),
            effective_at: now,
            created_at: now,
        };

        self.subscriptions
            .replace_current_subscription(&subscription)
            .await?;

        info!(
            "User {} moved from {} to {}",
            user_id,
            current.as_ref().map(|c| c.plan_id.as_str()).unwrap_or("no plan"),
            plan.id
        );

        let description = match &current {
            Some(c) => format!("Plan changed from {} to {}", c.plan_id, plan.id),
            None => format!("Subscribed to {}", plan.id),
        };

        // The subscription change stands even if the ledger write fails
        let record = NewBillingRecord {
            user_id: user_id.to_string(),
            subscription_id: Some(subscription.id.clone()),
            plan_id: Some(plan.id.clone()),
            amount: plan.price_monthly,
            currency: DEFAULT_CURRENCY.to_string(),
            status: BillingStatus::Paid,
            description: Some(description),
            billing_period_start: Some(now),
            billing_period_end: Some(next_billing_at),
        };
        if let Err(e) = self.subscriptions.record_billing_event(record).await {
            error!(
                "Failed to record billing history for user {} (subscription {}): {}",
                user_id, subscription.id, e
            );
        }

        Ok((subscription, plan))
    }

    /// Load two plans and compare their prices
    pub async fn get_plan_comparison(
        &self,
        current_plan_id: &str,
        target_plan_id: &str,
    ) -> Result<PlanComparison, StorageError> {
        let current = self
            .plans
            .get_plan(current_plan_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("Plan {}", current_plan_id)))?;
        let target = self
            .plans
            .get_plan(target_plan_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("Plan {}", target_plan_id)))?;

        if !target.is_active {
            warn!("Comparing against inactive plan {}", target.id);
        }

        Ok(compare_plans(&current, &target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(id: &str, price: f64) -> SubscriptionPlan {
        SubscriptionPlan {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            price_monthly: price,
            properties_limit: 10,
            storage_limit_mb: 100,
            features: vec![],
            is_active: true,
        }
    }

    #[test]
    fn test_compare_plans() {
        let basic = plan("basic", 499.0);
        let pro = plan("professional", 1499.0);

        let up = compare_plans(&basic, &pro);
        assert!(up.is_upgrade && !up.is_downgrade && !up.is_same_plan);
        assert_eq!(up.price_difference, 1000.0);

        let down = compare_plans(&pro, &basic);
        assert!(down.is_downgrade && !down.is_upgrade);

        let same = compare_plans(&basic, &basic);
        assert!(same.is_same_plan && !same.is_upgrade && !same.is_downgrade);
    }

    #[test]
    fn test_equal_price_different_plan_is_neither() {
        let a = plan("a", 100.0);
        let b = plan("b", 100.0);
        let cmp = compare_plans(&a, &b);
        assert!(!cmp.is_same_plan && !cmp.is_upgrade && !cmp.is_downgrade);
    }

    #[test]
    fn test_limit_messages_name_remediation() {
        let err = PlanChangeError::PropertyLimitExceeded {
            plan: "Starter".to_string(),
            current: 5,
            limit: 2,
            excess: 3,
        };
        assert_eq!(
            err.to_string(),
            "You have 5 properties, but the Starter plan allows only 2. Please remove 3 properties before downgrading."
        );
    }
}
