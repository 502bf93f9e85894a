use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response as AxumResponse},
};
use precognition_core::Response;

/// 协议响应的 axum 包装
#[derive(Debug, Clone)]
pub struct PrecognitionResponse(pub Response);

impl From<Response> for PrecognitionResponse {
    fn from(response: Response) -> Self {
        Self(response)
    }
}

impl IntoResponse for PrecognitionResponse {
    fn into_response(self) -> AxumResponse {
        let (status, headers, body) = self.0.into_parts();
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = match body {
            Some(body) => (status, body).into_response(),
            None => status.into_response(),
        };

        // 协议头覆盖 axum 为字符串响应体设置的 Content-Type
        let header_map = response.headers_mut();
        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    header_map.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}
