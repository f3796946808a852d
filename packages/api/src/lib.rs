// ABOUTME: HTTP API layer for Rentwise providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub mod auth;
pub mod billing_handlers;
pub mod functions_handlers;
pub mod notifications_handlers;
pub mod properties_handlers;
pub mod response;
pub mod settings_handlers;
pub mod state;
pub mod usage_handlers;

pub use auth::{CurrentUser, USER_ID_HEADER};
pub use functions_handlers::CRON_SECRET_HEADER;
pub use response::{ApiError, ApiResponse};
pub use state::AppState;

/// Creates the settings API router (nested under /api/settings)
pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(settings_handlers::get_settings).put(settings_handlers::update_settings),
        )
        .route("/login-activity", get(settings_handlers::list_login_activity))
        .route(
            "/exports",
            get(settings_handlers::list_exports).post(settings_handlers::create_export),
        )
}

/// Creates the billing API router (nested under /api/billing)
pub fn create_billing_router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(billing_handlers::list_plans))
        .route("/subscription", get(billing_handlers::get_subscription))
        .route("/subscription/change", post(billing_handlers::change_plan))
        .route(
            "/compare/{current}/{target}",
            get(billing_handlers::compare_plans),
        )
        .route("/history", get(billing_handlers::billing_history))
}

/// Creates the usage API router (nested under /api/usage)
pub fn create_usage_router() -> Router<AppState> {
    Router::new()
        .route("/", get(usage_handlers::get_usage))
        .route("/property-limit", get(usage_handlers::property_limit))
        .route("/trial-status", get(usage_handlers::trial_status))
}

/// Creates the properties API router (nested under /api/properties)
pub fn create_properties_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(properties_handlers::list_properties).post(properties_handlers::create_property),
        )
        .route("/{id}", delete(properties_handlers::delete_property))
        .route("/documents", post(properties_handlers::add_document))
}

/// Creates the notifications API router (nested under /api/notifications)
pub fn create_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications_handlers::list_notifications))
        .route("/{id}/read", post(notifications_handlers::mark_read))
}

/// Creates the functions router (nested under /api/functions)
pub fn create_functions_router() -> Router<AppState> {
    Router::new()
        .route("/delete-user", post(functions_handlers::delete_user))
        .route(
            "/generate-notifications",
            post(functions_handlers::generate_notifications),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "rentwise" }))
}

/// Full application router with state applied
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/signup", post(functions_handlers::signup))
        .nest("/api/settings", create_settings_router())
        .nest("/api/billing", create_billing_router())
        .nest("/api/usage", create_usage_router())
        .nest("/api/properties", create_properties_router())
        .nest("/api/notifications", create_notifications_router())
        .nest("/api/functions", create_functions_router())
        .with_state(state)
}
