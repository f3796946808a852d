// ABOUTME: HTTP request handlers for user settings, login activity, and exports
// ABOUTME: Every operation is scoped to the authenticated caller

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{ok, ok_or_internal_error, ApiError, ApiResponse, ApiResult};
use crate::state::AppState;
use rentwise_settings::{ExportType, UserSettings, UserSettingsUpdate};

const DEFAULT_ACTIVITY_LIMIT: i64 = 50;
const MAX_ACTIVITY_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    pub(crate) fn resolve(&self, default: i64, max: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}

/// Get settings for the caller, creating defaults on first access
pub async fn get_settings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> impl IntoResponse {
    info!("Getting settings for user: {}", user.id);
    let result = state.settings.get_user_settings(&user.id).await;
    ok_or_internal_error(result, "Failed to get settings")
}

pub async fn update_settings(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(update): Json<UserSettingsUpdate>,
) -> ApiResult<UserSettings> {
    info!("Updating settings for user: {}", user.id);
    let settings = state.settings.update_user_settings(&user.id, &update).await?;
    ok(settings)
}

pub async fn list_login_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let limit = query.resolve(DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT);
    let result = state
        .login_activity
        .list_login_activity(&user.id, limit)
        .await;
    ok_or_internal_error(result, "Failed to get login activity")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportRequest {
    pub export_type: ExportType,
}

pub async fn create_export(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "Creating {:?} export for user: {}",
        request.export_type, user.id
    );
    let export = state
        .exports
        .create_export_request(&user.id, request.export_type)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(export))))
}

pub async fn list_exports(
    State(state): State<AppState>,
    user: CurrentUser,
) -> impl IntoResponse {
    let result = state.exports.list_export_requests(&user.id).await;
    ok_or_internal_error(result, "Failed to list export requests")
}
