// ABOUTME: Subscription plans, usage-limit gating, and plan changes for Rentwise
// ABOUTME: Usage is always recomputed from source tables before any gating decision

pub mod limits;
pub mod plan_change;
pub mod plans;
pub mod subscriptions;
pub mod types;
pub mod usage;

pub use limits::{trial_status_for, UsageLimiter};
pub use plan_change::{compare_plans, PlanChangeError, PlanChangeService};
pub use plans::PlanStorage;
pub use subscriptions::SubscriptionStorage;
pub use types::{
    BillingRecord, BillingStatus, NewBillingRecord, PlanChangeOutcome, PlanComparison,
    PropertyLimitCheck, StorageLimitCheck, SubscriptionPlan, SubscriptionStatus, TrialStatus,
    UsageStats, UserSubscription,
};
pub use usage::UsageStorage;
