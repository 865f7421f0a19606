use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::common::error::GatewayError;

/// `info` payload of a failed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub status: String,
    pub description: String,
}

/// Outward-facing envelope shared by every route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub action: String,
    pub success: bool,
    pub info: Value,
    #[serde(skip)]
    pub http_status: StatusCode,
}

impl ApiResponse {
    fn new(action: &str, http_status: StatusCode, info: Value) -> Self {
        Self {
            action: action.to_string(),
            success: http_status.as_u16() < 400,
            info,
            http_status,
        }
    }

    pub fn success<T: Serialize>(route: &str, action: &str, content: &T) -> Self {
        match serde_json::to_value(content) {
            Ok(info) => {
                info!(route, action, "success response");
                crate::observability::request_succeeded(action);
                Self::new(action, StatusCode::OK, info)
            }
            Err(e) => Self::failed(route, action, &GatewayError::Json(e)),
        }
    }

    pub fn failed(route: &str, action: &str, err: &GatewayError) -> Self {
        let info = ErrorInfo {
            status: err.status(),
            description: err.description(),
        };
        error!(route, action, status = %info.status, description = %info.description, "failed response");
        crate::observability::request_failed(action, &info.status);

        let info = serde_json::to_value(&info).unwrap_or(Value::Null);
        Self::new(action, StatusCode::BAD_REQUEST, info)
    }

    /// Envelope for a handler outcome
    pub fn from_result<T: Serialize>(route: &str, action: &str, result: crate::common::Result<T>) -> Self {
        match result {
            Ok(content) => Self::success(route, action, &content),
            Err(err) => Self::failed(route, action, &err),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status = self.http_status;
        (status, Json(self)).into_response()
    }
}
