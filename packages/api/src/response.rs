// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides a consistent response envelope and error-to-status mapping

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use rentwise_auth::AuthError;
use rentwise_properties::PropertyError;
use rentwise_settings::SettingsError;
use rentwise_storage::StorageError;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Wrap a storage result: data on success, a logged 500 otherwise
pub fn ok_or_internal_error<T, E>(result: Result<T, E>, context: &str) -> Response
where
    T: Serialize,
    E: Display,
{
    match result {
        Ok(data) => ResponseJson(ApiResponse::success(data)).into_response(),
        Err(e) => {
            error!("{}: {}", context, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ApiResponse::<()>::error(context.to_string())),
            )
                .into_response()
        }
    }
}

/// Errors returned by handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!("Request failed: {}", detail);
        }
        let status = self.status();
        // Internal details stay in the log
        (status, ResponseJson(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ApiError::NotFound(format!("Not found: {}", what)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Storage(e) => e.into(),
            SettingsError::Validation(e) => ApiError::Validation(e.to_string()),
            SettingsError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SettingsError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<PropertyError> for ApiError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::LimitExceeded(reason) | PropertyError::StorageLimitExceeded(reason) => {
                ApiError::Forbidden(reason)
            }
            PropertyError::Validation(_) | PropertyError::InvalidLease(_) => {
                ApiError::Validation(err.to_string())
            }
            PropertyError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PropertyError::Storage(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden => ApiError::Forbidden(err.to_string()),
            AuthError::InvalidInput(msg) => ApiError::Validation(msg),
            AuthError::Storage(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<ResponseJson<ApiResponse<T>>, ApiError>;

/// Shorthand for a successful JSON envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(ResponseJson(ApiResponse::success(data)))
}
