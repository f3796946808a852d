// ABOUTME: HTTP request handlers for property records
// ABOUTME: Creation is plan-gated; limit refusals come back as 403 with the reason

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{ok, ok_or_internal_error, ApiError, ApiResponse, ApiResult};
use crate::state::AppState;
use rentwise_properties::{CreatePropertyInput, Document, NewDocument};

pub async fn list_properties(
    State(state): State<AppState>,
    user: CurrentUser,
) -> impl IntoResponse {
    let result = state.properties.list_properties(&user.id).await;
    ok_or_internal_error(result, "Failed to list properties")
}

pub async fn create_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreatePropertyInput>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Creating property for user: {}", user.id);
    let created = state.properties.create_property(&user.id, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn delete_property(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(property_id): Path<String>,
) -> ApiResult<String> {
    info!("Deleting property {} for user: {}", property_id, user.id);
    state
        .properties
        .delete_property(&user.id, &property_id)
        .await?;
    ok(property_id)
}

pub async fn add_document(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(document): Json<NewDocument>,
) -> ApiResult<Document> {
    let document = state.properties.add_document(&user.id, document).await?;
    ok(document)
}
