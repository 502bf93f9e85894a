//! 中间件模块

use axum::{extract::Request, middleware::Next, response::Response};
use precognition_core::constants::{PRECOGNITION_SUCCESS_HEADER, PRECOGNITIVE_HEADER, TRUE_VALUE};
use std::time::Instant;

/// 请求日志中间件，额外记录请求是否为预知请求
///
/// ```ignore
/// let app = Router::new()
///     .route("/users", post(precognitive(handler)))
///     .layer(axum::middleware::from_fn(request_logging));
/// ```
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let precognitive = req
        .headers()
        .get(PRECOGNITIVE_HEADER)
        .and_then(|value| value.to_str().ok())
        == Some(TRUE_VALUE);
    let start = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        precognitive,
        precognition_success = response.headers().contains_key(PRECOGNITION_SUCCESS_HEADER),
        elapsed = ?start.elapsed(),
        "Request completed"
    );

    response
}
