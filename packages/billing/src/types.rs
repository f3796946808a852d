// ABOUTME: Type definitions for plans, subscriptions, billing history, and limit checks
// ABOUTME: Row structures plus the result shapes returned by the usage-limit evaluator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use rentwise_core::UNLIMITED;

const BYTES_PER_MB: i64 = 1024 * 1024;

/// Static catalog row describing a priced tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_monthly: f64,
    /// Maximum active properties, `-1` for unlimited
    pub properties_limit: i64,
    /// Maximum storage in MB, `-1` for unlimited
    pub storage_limit_mb: i64,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl SubscriptionPlan {
    pub fn has_unlimited_properties(&self) -> bool {
        self.properties_limit == UNLIMITED
    }

    pub fn has_unlimited_storage(&self) -> bool {
        self.storage_limit_mb == UNLIMITED
    }

    /// Storage allowance in bytes, `None` when unlimited
    pub fn storage_limit_bytes(&self) -> Option<i64> {
        if self.has_unlimited_storage() {
            return None;
        }
        Some(self.storage_limit_mb.saturating_mul(BYTES_PER_MB))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Cancelled,
    Expired,
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSubscription {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub properties_used: i64,
    pub storage_used_mb: f64,
    pub last_billed_at: Option<DateTime<Utc>>,
    pub next_billing_at: Option<DateTime<Utc>>,
    pub previous_subscription_id: Option<String>,
    pub effective_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BillingStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Append-only ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BillingRecord {
    pub id: String,
    pub user_id: String,
    pub subscription_id: Option<String>,
    pub plan_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: BillingStatus,
    pub description: Option<String>,
    pub billing_period_start: Option<DateTime<Utc>>,
    pub billing_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBillingRecord {
    pub user_id: String,
    pub subscription_id: Option<String>,
    pub plan_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: BillingStatus,
    pub description: Option<String>,
    pub billing_period_start: Option<DateTime<Utc>>,
    pub billing_period_end: Option<DateTime<Utc>>,
}

/// Authoritative usage recomputed from source tables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub property_count: i64,
    pub storage_used_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLimitCheck {
    pub allowed: bool,
    pub reason: Option<String>,
    pub suggested_plan: Option<SubscriptionPlan>,
    pub current_plan: Option<SubscriptionPlan>,
}

impl PropertyLimitCheck {
    pub(crate) fn unrestricted() -> Self {
        Self {
            allowed: true,
            reason: None,
            suggested_plan: None,
            current_plan: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLimitCheck {
    pub allowed: bool,
    pub reason: Option<String>,
    pub used_mb: f64,
    pub limit_mb: Option<i64>,
    pub suggested_plan: Option<SubscriptionPlan>,
}

impl StorageLimitCheck {
    pub(crate) fn unrestricted() -> Self {
        Self {
            allowed: true,
            reason: None,
            used_mb: 0.0,
            limit_mb: None,
            suggested_plan: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialStatus {
    pub is_trial_user: bool,
    pub is_expired: bool,
    pub days_remaining: i64,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

impl TrialStatus {
    pub(crate) fn not_on_trial() -> Self {
        Self {
            is_trial_user: false,
            is_expired: false,
            days_remaining: 0,
            trial_ends_at: None,
        }
    }
}

/// Price relation between two plans, used for labeling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    pub is_upgrade: bool,
    pub is_downgrade: bool,
    pub is_same_plan: bool,
    pub price_difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanChangeOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<UserSubscription>,
}
