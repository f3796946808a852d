// ABOUTME: Shared application state for API handlers
// ABOUTME: One set of storage and service handles over a single connection pool

use sqlx::SqlitePool;

use rentwise_auth::{AccountService, SignupWebhook};
use rentwise_billing::{PlanChangeService, PlanStorage, SubscriptionStorage, UsageLimiter, UsageStorage};
use rentwise_notifications::NotificationService;
use rentwise_properties::PropertyService;
use rentwise_settings::{ExportStorage, LoginActivityStorage, SettingsStorage};

#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsStorage,
    pub login_activity: LoginActivityStorage,
    pub exports: ExportStorage,
    pub plans: PlanStorage,
    pub subscriptions: SubscriptionStorage,
    pub usage: UsageStorage,
    pub limiter: UsageLimiter,
    pub plan_change: PlanChangeService,
    pub properties: PropertyService,
    pub notifications: NotificationService,
    pub accounts: AccountService,
    pub signup_webhook: SignupWebhook,
    /// Shared secret required on the scheduled-job endpoint when set
    pub cron_secret: Option<String>,
}

impl AppState {
    pub fn new(pool: SqlitePool, signup_webhook: SignupWebhook, cron_secret: Option<String>) -> Self {
        Self {
            settings: SettingsStorage::new(pool.clone()),
            login_activity: LoginActivityStorage::new(pool.clone()),
            exports: ExportStorage::new(pool.clone()),
            plans: PlanStorage::new(pool.clone()),
            subscriptions: SubscriptionStorage::new(pool.clone()),
            usage: UsageStorage::new(pool.clone()),
            limiter: UsageLimiter::new(pool.clone()),
            plan_change: PlanChangeService::new(pool.clone()),
            properties: PropertyService::new(pool.clone()),
            notifications: NotificationService::new(pool.clone()),
            accounts: AccountService::new(pool),
            signup_webhook,
            cron_secret,
        }
    }
}
