// ABOUTME: Daily notification generation for lease expiry and rent reminders
// ABOUTME: Idempotent inserts keyed on user, kind, lease, and date, plus a weekly cleanup

use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Utc, Weekday};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::types::{GenerationSummary, Notification, NotificationKind};
use rentwise_core::constants::{LEASE_EXPIRY_WINDOW_DAYS, NOTIFICATION_RETENTION_DAYS};
use rentwise_core::{generate_id, DEFAULT_CURRENCY, DEFAULT_REMINDER_DAYS_BEFORE};
use rentwise_storage::StorageError;

/// Active lease joined with its property and the owner's alert preferences
#[derive(Debug, FromRow)]
struct LeaseCandidate {
    lease_id: String,
    owner_id: String,
    property_name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    monthly_rent: f64,
    rent_due_day: i64,
    lease_expiry_alerts: Option<bool>,
    rent_reminders: Option<bool>,
    reminder_days_before: Option<i64>,
    currency: Option<String>,
}

#[derive(Clone)]
pub struct NotificationService {
    pool: SqlitePool,
}

impl NotificationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Materialize today's notifications for every active lease. Running it
    /// twice on the same day creates nothing new. On Sundays read
    /// notifications past the retention window are deleted as well.
    pub async fn generate_daily_notifications(
        &self,
        today: NaiveDate,
    ) -> Result<GenerationSummary, StorageError> {
        let leases = sqlx::query_as::<_, LeaseCandidate>(
            r#"
            SELECT
                l.id AS lease_id, l.owner_id, p.name AS property_name,
                l.start_date, l.end_date, l.monthly_rent, l.rent_due_day,
                s.lease_expiry_alerts, s.rent_reminders, s.reminder_days_before, s.currency
            FROM leases l
            JOIN properties p ON p.id = l.property_id
            LEFT JOIN user_settings s ON s.user_id = l.owner_id
            WHERE l.status = 'active' AND p.is_active = 1 AND l.end_date >= ?
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut summary = GenerationSummary {
            leases_scanned: leases.len() as u64,
            ..Default::default()
        };

        for lease in &leases {
            if lease.lease_expiry_alerts.unwrap_or(true) {
                if let Some(days_left) = expiry_days_left(today, lease.end_date) {
                    let created = self
                        .insert(
                            &lease.owner_id,
                            NotificationKind::LeaseExpiring,
                            &lease.lease_id,
                            "Lease expiring soon",
                            &format!(
                                "The lease for {} ends on {} ({} days left).",
                                lease.property_name, lease.end_date, days_left
                            ),
                            lease.end_date,
                        )
                        .await?;
                    summary.lease_expiring_created += created;
                }
            }

            if lease.rent_reminders.unwrap_or(true) {
                let days_before = lease
                    .reminder_days_before
                    .unwrap_or(DEFAULT_REMINDER_DAYS_BEFORE);
                if let Some(due) = rent_reminder_due_date(
                    today,
                    lease.rent_due_day,
                    days_before,
                    lease.start_date,
                    lease.end_date,
                ) {
                    let currency = lease.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
                    let created = self
                        .insert(
                            &lease.owner_id,
                            NotificationKind::RentDue,
                            &lease.lease_id,
                            "Rent due",
                            &format!(
                                "Rent of {} {:.2} for {} is due on {}.",
                                currency, lease.monthly_rent, lease.property_name, due
                            ),
                            due,
                        )
                        .await?;
                    summary.rent_due_created += created;
                }
            }
        }

        if today.weekday() == Weekday::Sun {
            summary.cleaned_up = Some(self.cleanup_read_notifications(today).await?);
        }

        info!(
            "Generated notifications for {}: {} leases scanned, {} expiring, {} rent due",
            today,
            summary.leases_scanned,
            summary.lease_expiring_created,
            summary.rent_due_created
        );
        Ok(summary)
    }

    /// Delete read notifications created before the retention window
    pub async fn cleanup_read_notifications(&self, today: NaiveDate) -> Result<u64, StorageError> {
        let cutoff = (today - Days::new(NOTIFICATION_RETENTION_DAYS as u64))
            .and_time(NaiveTime::MIN)
            .and_utc();

        let result = sqlx::query("DELETE FROM notifications WHERE is_read = 1 AND created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        info!(
            "Removed {} read notifications older than {}",
            result.rows_affected(),
            cutoff
        );
        Ok(result.rows_affected())
    }

    pub async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>, StorageError> {
        debug!("Fetching notifications for user: {}", user_id);

        let sql = if unread_only {
            "SELECT * FROM notifications WHERE user_id = ? AND is_read = 0 ORDER BY notify_on ASC, created_at DESC"
        } else {
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY notify_on ASC, created_at DESC"
        };

        sqlx::query_as::<_, Notification>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }

    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
            .bind(notification_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "Notification {}",
                notification_id
            )));
        }
        Ok(())
    }

    /// Returns 1 when a row was written, 0 when it already existed
    async fn insert(
        &self,
        user_id: &str,
        kind: NotificationKind,
        reference_id: &str,
        title: &str,
        message: &str,
        notify_on: NaiveDate,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO notifications (id, user_id, kind, reference_id, title, message, notify_on, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(generate_id())
        .bind(user_id)
        .bind(kind)
        .bind(reference_id)
        .bind(title)
        .bind(message)
        .bind(notify_on)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }
}

/// Days until `end_date` when it falls inside the expiry window
fn expiry_days_left(today: NaiveDate, end_date: NaiveDate) -> Option<i64> {
    let days_left = (end_date - today).num_days();
    (0..=LEASE_EXPIRY_WINDOW_DAYS)
        .contains(&days_left)
        .then_some(days_left)
}

/// First rent due date on or after `from`. A due day past the end of a short
/// month falls on that month's last day.
pub fn next_rent_due_date(from: NaiveDate, rent_due_day: i64) -> Option<NaiveDate> {
    let this_month = due_date_in_month(from.year(), from.month(), rent_due_day)?;
    if this_month >= from {
        return Some(this_month);
    }
    let next = from.with_day(1)?.checked_add_months(Months::new(1))?;
    due_date_in_month(next.year(), next.month(), rent_due_day)
}

/// The due date to remind about today, if today is exactly `days_before`
/// days ahead of a due date inside the lease term.
fn rent_reminder_due_date(
    today: NaiveDate,
    rent_due_day: i64,
    days_before: i64,
    lease_start: NaiveDate,
    lease_end: NaiveDate,
) -> Option<NaiveDate> {
    let target = today.checked_add_days(Days::new(u64::try_from(days_before).ok()?))?;
    let due = next_rent_due_date(target, rent_due_day)?;
    (due == target && due >= lease_start && due <= lease_end).then_some(due)
}

fn due_date_in_month(year: i32, month: u32, rent_due_day: i64) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    let day = u32::try_from(rent_due_day.clamp(1, 31)).ok()?.min(last.day());
    NaiveDate::from_ymd_opt(year, month, day)
}
