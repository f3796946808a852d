// ABOUTME: Usage-limit evaluator for plan-gated actions
// ABOUTME: Property and storage limit checks plus trial status, failing open on lookup errors

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::plans::PlanStorage;
use crate::subscriptions::SubscriptionStorage;
use crate::types::{
    PropertyLimitCheck, StorageLimitCheck, SubscriptionPlan, SubscriptionStatus, TrialStatus,
    UserSubscription,
};
use crate::usage::UsageStorage;
use rentwise_core::{bytes_to_mb, TRIAL_DURATION_DAYS};
use rentwise_storage::StorageError;

/// Decides whether a mutating action fits the user's current plan.
///
/// Checks never mutate anything. A lookup failure or a missing subscription
/// yields a permissive answer.
#[derive(Clone)]
pub struct UsageLimiter {
    plans: PlanStorage,
    subscriptions: SubscriptionStorage,
    usage: UsageStorage,
}

impl UsageLimiter {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            plans: PlanStorage::new(pool.clone()),
            subscriptions: SubscriptionStorage::new(pool.clone()),
            usage: UsageStorage::new(pool),
        }
    }

    /// Can the user add one more property?
    pub async fn check_property_limit(&self, user_id: &str) -> PropertyLimitCheck {
        match self.evaluate_property_limit(user_id).await {
            Ok(check) => check,
            Err(e) => {
                warn!(
                    "Property limit check failed for user {}, allowing: {}",
                    user_id, e
                );
                PropertyLimitCheck::unrestricted()
            }
        }
    }

    /// Can the user store `additional_bytes` more?
    pub async fn check_storage_limit(
        &self,
        user_id: &str,
        additional_bytes: i64,
    ) -> StorageLimitCheck {
        match self.evaluate_storage_limit(user_id, additional_bytes).await {
            Ok(check) => check,
            Err(e) => {
                warn!(
                    "Storage limit check failed for user {}, allowing: {}",
                    user_id, e
                );
                StorageLimitCheck::unrestricted()
            }
        }
    }

    pub async fn check_trial_status(&self, user_id: &str) -> TrialStatus {
        self.check_trial_status_at(user_id, Utc::now()).await
    }

    /// Trial status evaluated at `now`
    pub async fn check_trial_status_at(&self, user_id: &str, now: DateTime<Utc>) -> TrialStatus {
        match self.subscriptions.get_current_subscription(user_id).await {
            Ok(Some(subscription)) => trial_status_for(&subscription, now),
            Ok(None) => TrialStatus::not_on_trial(),
            Err(e) => {
                warn!(
                    "Trial status lookup failed for user {}, treating as non-trial: {}",
                    user_id, e
                );
                TrialStatus::not_on_trial()
            }
        }
    }

    async fn current_plan(
        &self,
        user_id: &str,
    ) -> Result<Option<SubscriptionPlan>, StorageError> {
        let Some(subscription) = self.subscriptions.get_current_subscription(user_id).await? else {
            warn!("User {} has no current subscription, not enforcing limits", user_id);
            return Ok(None);
        };

        let Some(plan) = self.plans.get_plan(&subscription.plan_id).await? else {
            warn!(
                "Subscription {} references missing plan {}, not enforcing limits",
                subscription.id, subscription.plan_id
            );
            return Ok(None);
        };

        Ok(Some(plan))
    }

    async fn evaluate_property_limit(
        &self,
        user_id: &str,
    ) -> Result<PropertyLimitCheck, StorageError> {
        let Some(plan) = self.current_plan(user_id).await? else {
            return Ok(PropertyLimitCheck::unrestricted());
        };

        let properties_used = self.usage.get_current_property_count(user_id).await?;
        debug!(
            "User {} uses {} of {} properties on {}",
            user_id, properties_used, plan.properties_limit, plan.id
        );

        if plan.has_unlimited_properties() || properties_used < plan.properties_limit {
            return Ok(PropertyLimitCheck {
                allowed: true,
                reason: None,
                suggested_plan: None,
                current_plan: Some(plan),
            });
        }

        let suggested_plan = self.suggest_upgrade(&plan).await;
        Ok(PropertyLimitCheck {
            allowed: false,
            reason: Some(format!(
                "You have reached the limit of {} properties on the {} plan. Upgrade to add more properties.",
                plan.properties_limit, plan.name
            )),
            suggested_plan,
            current_plan: Some(plan),
        })
    }

    async fn evaluate_storage_limit(
        &self,
        user_id: &str,
        additional_bytes: i64,
    ) -> Result<StorageLimitCheck, StorageError> {
        let Some(plan) = self.current_plan(user_id).await? else {
            return Ok(StorageLimitCheck::unrestricted());
        };

        let used_bytes = self.usage.calculate_storage_bytes(user_id).await?;
        let used_mb = bytes_to_mb(used_bytes);

        let Some(limit_bytes) = plan.storage_limit_bytes() else {
            return Ok(StorageLimitCheck {
                allowed: true,
                reason: None,
                used_mb,
                limit_mb: None,
                suggested_plan: None,
            });
        };

        // An overflowing total is over any limit
        let fits = used_bytes
            .checked_add(additional_bytes.max(0))
            .is_some_and(|projected| projected <= limit_bytes);
        if fits {
            return Ok(StorageLimitCheck {
                allowed: true,
                reason: None,
                used_mb,
                limit_mb: Some(plan.storage_limit_mb),
                suggested_plan: None,
            });
        }

        let suggested_plan = self.suggest_upgrade(&plan).await;
        Ok(StorageLimitCheck {
            allowed: false,
            reason: Some(format!(
                "This upload would exceed the {} MB storage limit of the {} plan ({} MB used). Upgrade for more storage.",
                plan.storage_limit_mb, plan.name, used_mb
            )),
            used_mb,
            limit_mb: Some(plan.storage_limit_mb),
            suggested_plan,
        })
    }

    async fn suggest_upgrade(&self, plan: &SubscriptionPlan) -> Option<SubscriptionPlan> {
        match self.plans.next_higher_plan(plan.price_monthly).await {
            Ok(next) => next,
            Err(e) => {
                warn!("Failed to look up upgrade for plan {}: {}", plan.id, e);
                None
            }
        }
    }
}

/// Trial status of `subscription` at `now`; non-trial subscriptions report
/// `is_trial_user = false`.
pub fn trial_status_for(subscription: &UserSubscription, now: DateTime<Utc>) -> TrialStatus {
    if subscription.status != SubscriptionStatus::Trial {
        return TrialStatus::not_on_trial();
    }

    let elapsed_days = (now - subscription.started_at).num_days();
    let days_remaining = TRIAL_DURATION_DAYS - elapsed_days;

    TrialStatus {
        is_trial_user: true,
        is_expired: days_remaining <= 0,
        days_remaining,
        trial_ends_at: Some(subscription.started_at + Duration::days(TRIAL_DURATION_DAYS)),
    }
}
