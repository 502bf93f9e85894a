//! # Precognition Core
//!
//! 预知请求（Precognitive Request）协议核心
//!
//! 客户端发送带 `Precognitive: true` 头的请求时，只执行前置中间件（通常是验证逻辑），
//! 不执行主处理器，然后把验证结果塑造成响应：
//!
//! - **全部通过** - 204，`Precognition-Success: true`
//! - **验证失败** - 422，`{message, errors}`
//! - **部分验证** - 客户端通过 `Precognition-Validate-Only` 声明只关心的字段
//!
//! 普通请求按 before → main → after 的顺序执行，结果原样返回
//!
//! ```ignore
//! use precognition_core::prelude::*;
//!
//! let handler = PrecognitiveHandler::new(
//!     HandlerBundle::new(main_fn(|request| Box::pin(create_user(request))))
//!         .before(from_fn(validate_user)),
//!     [KnownErrorParser::Validator.into()],
//! );
//!
//! match handler.handle(&request).await? {
//!     Dispatch::Completed(user) => { /* 业务结果 */ }
//!     Dispatch::Precognition(response) => { /* 协议响应 */ }
//! }
//! ```

pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod logging;
pub mod parser;
pub mod request;
pub mod responder;
pub mod response;
pub mod validation;

pub use config::PrecognitionConfig;
pub use dispatcher::{Dispatch, PrecognitiveHandler};
pub use error::{BoxError, PrecognitionError, PrecognitionResult};
pub use handler::{
    from_async_fn, from_fn, main_fn, resolve_handlers, HandlerBundle, HandlerList, MainHandler,
    Middleware, MiddlewareResult,
};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use parser::{resolve_error_parser, ErrorParser, KnownErrorParser, ParseFn, RaisedError};
pub use request::Request;
pub use response::{create_response, Response};
pub use validation::{FieldErrors, FieldMessages, ValidationErrors, ValidationErrorsData};

// 导出 async_trait，方便用户实现 Middleware / MainHandler
pub use async_trait;

pub mod prelude {
    //! 预导入模块

    pub use crate::config::PrecognitionConfig;
    pub use crate::constants::*;
    pub use crate::dispatcher::{Dispatch, PrecognitiveHandler};
    pub use crate::error::{BoxError, PrecognitionError, PrecognitionResult};
    pub use crate::handler::{
        from_async_fn, from_fn, main_fn, HandlerBundle, HandlerList, MainHandler, Middleware,
        MiddlewareResult,
    };
    pub use crate::parser::{ErrorParser, KnownErrorParser};
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use crate::validation::{FieldErrors, FieldMessages, ValidationErrorsData};
}
