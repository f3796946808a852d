// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves the already-authenticated caller from the X-User-Id header

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::response::ApiError;

/// Header set by the identity layer in front of this service
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Current authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty());

        match id {
            Some(id) => Ok(Self { id: id.to_string() }),
            None => {
                debug!(path = %parts.uri.path(), "Request without user identity");
                Err(ApiError::Unauthorized(
                    "Authentication required. Please include the X-User-Id header.".to_string(),
                ))
            }
        }
    }
}
