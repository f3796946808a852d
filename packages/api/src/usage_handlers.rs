// ABOUTME: HTTP request handlers for usage statistics and limit checks
// ABOUTME: Limit checks never fail the request; they answer permissively instead

use axum::{extract::State, response::IntoResponse};

use crate::auth::CurrentUser;
use crate::response::{ok, ok_or_internal_error, ApiResult};
use crate::state::AppState;
use rentwise_billing::{PropertyLimitCheck, TrialStatus};

pub async fn get_usage(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    let result = state.usage.get_usage_stats(&user.id).await;
    ok_or_internal_error(result, "Failed to get usage")
}

pub async fn property_limit(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<PropertyLimitCheck> {
    ok(state.limiter.check_property_limit(&user.id).await)
}

pub async fn trial_status(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<TrialStatus> {
    ok(state.limiter.check_trial_status(&user.id).await)
}
