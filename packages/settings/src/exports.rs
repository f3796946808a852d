// ABOUTME: Data export request storage
// ABOUTME: Creates export requests and advances them through their status lifecycle

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};
use crate::types::{DataExportRequest, ExportStatus, ExportType};
use rentwise_core::generate_id;
use rentwise_storage::StorageError;

#[derive(Clone)]
pub struct ExportStorage {
    pool: SqlitePool,
}

impl ExportStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_export_request(
        &self,
        user_id: &str,
        export_type: ExportType,
    ) -> Result<DataExportRequest, StorageError> {
        let request = DataExportRequest {
            id: generate_id(),
            user_id: user_id.to_string(),
            export_type,
            status: ExportStatus::Pending,
            file_url: None,
            error_message: None,
            requested_at: Utc::now(),
            completed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO data_export_requests (id, user_id, export_type, status, requested_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&request.id)
        .bind(&request.user_id)
        .bind(request.export_type)
        .bind(request.status)
        .bind(request.requested_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        info!("Queued {:?} export {} for user {}", export_type, request.id, user_id);
        Ok(request)
    }

    pub async fn list_export_requests(
        &self,
        user_id: &str,
    ) -> Result<Vec<DataExportRequest>, StorageError> {
        debug!("Fetching export requests for user: {}", user_id);

        sqlx::query_as::<_, DataExportRequest>(
            "SELECT * FROM data_export_requests WHERE user_id = ? ORDER BY requested_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    pub async fn get_export_request(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<DataExportRequest>, StorageError> {
        sqlx::query_as::<_, DataExportRequest>(
            "SELECT * FROM data_export_requests WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)
    }

    /// Advance a request along pending -> processing -> completed | failed.
    ///
    /// The update is conditioned on the status that was read, so two workers
    /// racing on the same request cannot both advance it.
    pub async fn update_export_status(
        &self,
        user_id: &str,
        id: &str,
        status: ExportStatus,
        file_url: Option<String>,
        error_message: Option<String>,
    ) -> SettingsResult<DataExportRequest> {
        let current = self
            .get_export_request(user_id, id)
            .await?
            .ok_or_else(|| SettingsError::NotFound(id.to_string()))?;

        if !current.status.can_transition_to(status) {
            return Err(SettingsError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let completed_at = status.is_terminal().then(Utc::now);
        let result = sqlx::query(
            r#"
            UPDATE data_export_requests
            SET status = ?, file_url = COALESCE(?, file_url),
                error_message = COALESCE(?, error_message), completed_at = ?
            WHERE id = ? AND user_id = ? AND status = ?
            "#,
        )
        .bind(status)
        .bind(&file_url)
        .bind(&error_message)
        .bind(completed_at)
        .bind(id)
        .bind(user_id)
        .bind(current.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SettingsError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        debug!("Export {} moved from {} to {}", id, current.status, status);

        self.get_export_request(user_id, id)
            .await?
            .ok_or_else(|| SettingsError::NotFound(id.to_string()))
    }
}
