// ABOUTME: HTTP handlers for account-level functions and the scheduled notification job
// ABOUTME: Account deletion, signup bookkeeping, and the cron-triggered daily run

use axum::{
    body::Bytes,
    extract::State,
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::response::{ok, ApiError, ApiResult};
use crate::state::AppState;
use rentwise_auth::{DeletionSummary, SignupPayload};
use rentwise_billing::UserSubscription;
use rentwise_core::is_valid_email;
use rentwise_notifications::GenerationSummary;
use rentwise_settings::{LoginEvent, NewLoginActivity, UserSettings};

/// Header carrying the shared secret for the scheduled job
pub const CRON_SECRET_HEADER: &str = "X-Cron-Secret";

/// Plan new accounts start their trial on
pub const DEFAULT_TRIAL_PLAN: &str = "basic";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: String,
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<DeleteUserRequest>,
) -> ApiResult<DeletionSummary> {
    info!("User {} requested deletion of {}", user.id, request.user_id);
    let summary = state
        .accounts
        .delete_account(&user.id, &request.user_id)
        .await?;
    ok(summary)
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateNotificationsRequest {
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

pub async fn generate_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<GenerationSummary> {
    if let Some(secret) = &state.cron_secret {
        let provided = headers
            .get(CRON_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(secret.as_str()) {
            warn!("Rejected notification job call with missing or wrong secret");
            return Err(ApiError::Unauthorized("Invalid cron secret".to_string()));
        }
    }

    // Schedulers often post an empty body
    let request: GenerateNotificationsRequest = if body.is_empty() {
        GenerateNotificationsRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))?
    };
    let today = request.date.unwrap_or_else(|| Utc::now().date_naive());
    info!("Running notification job for {}", today);

    let summary = state.notifications.generate_daily_notifications(today).await?;
    ok(summary)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub plan_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub subscription: UserSubscription,
    pub settings: UserSettings,
}

/// Bookkeeping for a freshly authenticated account: trial, settings, webhook
pub async fn signup(
    State(state): State<AppState>,
    user: CurrentUser,
    headers: HeaderMap,
    Json(request): Json<SignupRequest>,
) -> ApiResult<SignupResponse> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if !is_valid_email(&request.email) {
        return Err(ApiError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }

    let plan_id = request.plan_id.as_deref().unwrap_or(DEFAULT_TRIAL_PLAN);
    let subscription = state
        .subscriptions
        .start_trial(&user.id, plan_id, Utc::now())
        .await?;
    let settings = state.settings.get_user_settings(&user.id).await?;

    let activity = NewLoginActivity {
        user_id: user.id.clone(),
        event: LoginEvent::Login,
        ip_address: None,
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        success: true,
    };
    if let Err(e) = state.login_activity.record_login_activity(activity).await {
        warn!("Failed to record signup login for user {}: {}", user.id, e);
    }

    state.signup_webhook.notify(SignupPayload {
        name: name.to_string(),
        email: request.email.trim().to_string(),
        user_id: user.id.clone(),
    });

    info!("Signed up user {} on {} trial", user.id, subscription.plan_id);
    ok(SignupResponse {
        subscription,
        settings,
    })
}
