//! 请求转换
//!
//! hyper 会把请求头名称转为小写，而协议按区分大小写的名称读取请求头，
//! 因此转换时恢复为 HTTP/1 的规范写法（`precognition-validate-only` →
//! `Precognition-Validate-Only`）

use axum::extract::Request as AxumRequest;
use precognition_core::Request;

use crate::error::WebError;

/// 请求体大小上限，与 axum 的默认限制一致
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// 把 axum 请求转换为协议请求，缓冲整个请求体
pub async fn into_request(request: AxumRequest) -> Result<Request, WebError> {
    into_request_with_limit(request, DEFAULT_BODY_LIMIT).await
}

pub async fn into_request_with_limit(request: AxumRequest, limit: usize) -> Result<Request, WebError> {
    let (parts, body) = request.into_parts();

    let mut converted = Request::new();
    for (name, value) in &parts.headers {
        match value.to_str() {
            Ok(value) => {
                converted = converted.with_header(canonical_header_name(name.as_str()), value);
            }
            Err(_) => tracing::debug!(header = %name, "Skipping non UTF-8 header"),
        }
    }

    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| WebError::BodyRead(e.to_string()))?;

    if !bytes.is_empty() {
        let body = String::from_utf8(bytes.to_vec()).map_err(|_| WebError::InvalidUtf8)?;
        converted = converted.with_body(body);
    }

    Ok(converted)
}

/// 每个以 `-` 分隔的片段首字母大写，其余小写
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
