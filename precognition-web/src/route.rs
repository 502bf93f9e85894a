//! 路由适配
//!
//! 把 [`PrecognitiveHandler`] 挂载为 axum 处理器：
//!
//! ```ignore
//! let app = Router::new().route("/users", post(precognitive(create_user_handler())));
//! ```

use axum::{
    extract::Request as AxumRequest,
    response::{IntoResponse, Response as AxumResponse},
};
use futures::future::BoxFuture;
use precognition_core::{Dispatch, PrecognitiveHandler};
use std::sync::Arc;

use crate::error::WebError;
use crate::extract::into_request;
use crate::response::PrecognitionResponse;

/// 把处理器转换为可以传给 `axum::routing::post` 等方法的闭包
pub fn precognitive<T>(
    handler: PrecognitiveHandler<T>,
) -> impl Fn(AxumRequest) -> BoxFuture<'static, AxumResponse> + Clone + Send + Sync + 'static
where
    T: IntoResponse + Send + 'static,
{
    let handler = Arc::new(handler);
    move |request: AxumRequest| -> BoxFuture<'static, AxumResponse> {
        let handler = Arc::clone(&handler);
        Box::pin(async move { dispatch(&handler, request).await })
    }
}

/// 转换请求、调度并生成 axum 响应
pub async fn dispatch<T>(handler: &PrecognitiveHandler<T>, request: AxumRequest) -> AxumResponse
where
    T: IntoResponse + Send,
{
    let request = match into_request(request).await {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match handler.handle(&request).await {
        Ok(Dispatch::Completed(result)) => result.into_response(),
        Ok(Dispatch::Precognition(response)) => PrecognitionResponse(response).into_response(),
        Err(e) => WebError::Handler(e).into_response(),
    }
}
