//! Web 层错误
//!
//! 普通请求中处理器的失败不被协议翻译，在这里统一转换为 JSON 错误响应

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use precognition_core::BoxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebError {
    /// 请求体读取失败 - 400 Bad Request
    #[error("Failed to read request body: {0}")]
    BodyRead(String),

    /// 请求体不是 UTF-8 - 400 Bad Request
    #[error("Request body is not valid UTF-8")]
    InvalidUtf8,

    /// 普通请求中处理器失败 - 500 Internal Server Error
    #[error("Handler failed: {0}")]
    Handler(#[source] BoxError),
}

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::BodyRead(_) | WebError::InvalidUtf8 => StatusCode::BAD_REQUEST,
            WebError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::error!(error = %self, status = %status.as_u16(), "Request failed");

        ErrorResponse::new(status, self.to_string()).into_response()
    }
}

/// 标准错误响应格式
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown Error").to_string(),
            message,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
