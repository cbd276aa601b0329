//! API Response wrapper

use axum::{http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

/// Status code plus envelope, ready to be returned from a handler.
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn success_with_message(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// 200 with the value, or 404 naming `what`.
pub fn found<T: Serialize>(data: Option<T>, what: &str) -> ApiResult<T> {
    data.map(ok)
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", what)))
}

/// 200 when a row was removed, otherwise 404 naming `what`.
pub fn deleted(removed: bool, what: &str) -> ApiResult<()> {
    if !removed {
        return Err(ApiError::NotFound(format!("{} not found", what)));
    }
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_message(None, format!("{} deleted", what))),
    ))
}
