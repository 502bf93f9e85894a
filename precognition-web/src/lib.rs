//! # Precognition Web
//!
//! 基于 Axum 的预知请求集成
//!
//! - **请求转换** - axum 请求 → 协议请求，恢复请求头的规范大小写
//! - **响应转换** - 协议响应实现 `IntoResponse`
//! - **路由适配** - `precognitive(handler)` 直接作为路由处理器
//! - **请求日志** - 记录预知请求的结果

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod route;

pub use error::{ErrorResponse, WebError};
pub use extract::{canonical_header_name, into_request, into_request_with_limit};
pub use middleware::request_logging;
pub use response::PrecognitionResponse;
pub use route::{dispatch, precognitive};

pub mod prelude {
    //! 预导入模块

    pub use crate::error::WebError;
    pub use crate::middleware::request_logging;
    pub use crate::response::PrecognitionResponse;
    pub use crate::route::precognitive;
    pub use precognition_core::prelude::*;

    pub use axum;
    pub use axum::routing::{delete, get, patch, post, put};
    pub use axum::Router;
}
