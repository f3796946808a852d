// ABOUTME: HTTP request handlers for plans, subscriptions, and billing history
// ABOUTME: Plan changes report rejections in the response body rather than as server errors

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{ok, ok_or_internal_error, ApiResponse, ApiResult};
use crate::settings_handlers::LimitQuery;
use crate::state::AppState;
use rentwise_billing::PlanComparison;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const MAX_HISTORY_LIMIT: i64 = 500;

pub async fn list_plans(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.plans.list_active_plans().await;
    ok_or_internal_error(result, "Failed to list plans")
}

/// Current subscription, `null` when the caller has none
pub async fn get_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
) -> impl IntoResponse {
    let result = state.subscriptions.get_current_subscription(&user.id).await;
    ok_or_internal_error(result, "Failed to get subscription")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePlanRequest {
    pub plan_id: String,
}

pub async fn change_plan(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ChangePlanRequest>,
) -> impl IntoResponse {
    info!(
        "User {} requested plan change to {}",
        user.id, request.plan_id
    );

    let outcome = state
        .plan_change
        .change_subscription_plan(&user.id, &request.plan_id)
        .await;

    if outcome.success {
        (StatusCode::OK, Json(ApiResponse::success(outcome))).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(outcome.message)),
        )
            .into_response()
    }
}

pub async fn compare_plans(
    State(state): State<AppState>,
    Path((current, target)): Path<(String, String)>,
) -> ApiResult<PlanComparison> {
    let comparison = state.plan_change.get_plan_comparison(&current, &target).await?;
    ok(comparison)
}

pub async fn billing_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<LimitQuery>,
) -> impl IntoResponse {
    let limit = query.resolve(DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);
    let result = state
        .subscriptions
        .list_billing_history(&user.id, limit)
        .await;
    ok_or_internal_error(result, "Failed to get billing history")
}
