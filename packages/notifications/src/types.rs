// ABOUTME: Type definitions for generated notifications
// ABOUTME: Notification rows, kinds, and the per-run generation summary

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum NotificationKind {
    LeaseExpiring,
    RentDue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    /// Lease the notification is about
    pub reference_id: String,
    pub title: String,
    pub message: String,
    /// Date the notification refers to; part of the idempotency key
    pub notify_on: NaiveDate,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub leases_scanned: u64,
    pub lease_expiring_created: u64,
    pub rent_due_created: u64,
    /// Only set on the weekly cleanup run
    pub cleaned_up: Option<u64>,
}
