// ABOUTME: HTTP request handlers for the caller's notifications
// ABOUTME: Listing with an unread filter and marking individual notifications read

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::response::{ok, ok_or_internal_error, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<NotificationQuery>,
) -> impl IntoResponse {
    let result = state
        .notifications
        .list_notifications(&user.id, query.unread_only)
        .await;
    ok_or_internal_error(result, "Failed to list notifications")
}

pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(notification_id): Path<String>,
) -> ApiResult<String> {
    state
        .notifications
        .mark_read(&user.id, &notification_id)
        .await?;
    ok(notification_id)
}
