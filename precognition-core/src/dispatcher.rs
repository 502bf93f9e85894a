//! 调度器
//!
//! 根据 `Precognitive` 请求头决定执行路径：
//!
//! 1. **普通请求** - 依次执行前置中间件、主处理器、后置中间件，原样返回主处理器的结果，
//!    任何失败都直接传播给调用方
//! 2. **预知请求** - 只执行前置中间件，失败时通过错误解析器链转换为验证错误响应

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::error::BoxError;
use crate::handler::{HandlerBundle, Middleware, MiddlewareResult};
use crate::parser::{ErrorParser, ParseFn, RaisedError};
use crate::request::Request;
use crate::responder::{error_response, success_response, validation_errors_response};
use crate::response::Response;
use crate::validation::ValidationErrorsData;

/// 调度结果
#[derive(Debug)]
pub enum Dispatch<T> {
    /// 普通请求：主处理器的结果
    Completed(T),
    /// 预知请求：协议响应
    Precognition(Response),
}

impl<T> Dispatch<T> {
    pub fn is_precognition(&self) -> bool {
        matches!(self, Self::Precognition(_))
    }

    pub fn into_completed(self) -> Option<T> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Precognition(_) => None,
        }
    }

    pub fn into_precognition(self) -> Option<Response> {
        match self {
            Self::Completed(_) => None,
            Self::Precognition(response) => Some(response),
        }
    }
}

/// 支持预知请求的处理器
pub struct PrecognitiveHandler<T> {
    handlers: HandlerBundle<T>,
    parsers: Vec<ParseFn>,
}

impl<T: Send> PrecognitiveHandler<T> {
    /// 解析器按传入顺序尝试，第一个匹配的生效
    pub fn new(handlers: HandlerBundle<T>, error_parsers: impl IntoIterator<Item = ErrorParser>) -> Self {
        Self {
            handlers,
            parsers: error_parsers
                .into_iter()
                .map(|parser| parser.resolve())
                .collect(),
        }
    }

    pub fn handlers(&self) -> &HandlerBundle<T> {
        &self.handlers
    }

    pub async fn handle(&self, request: &Request) -> Result<Dispatch<T>, BoxError> {
        if request.is_precognitive() {
            tracing::debug!(
                before_handlers = self.handlers.before_handlers().len(),
                "Handling precognitive request"
            );
            return Ok(Dispatch::Precognition(self.handle_precognitive(request).await));
        }

        run_sequence(self.handlers.before_handlers(), request, "before").await?;
        let result = self.handlers.main_handler().call(request).await?;
        run_sequence(self.handlers.after_handlers(), request, "after").await?;

        Ok(Dispatch::Completed(result))
    }

    async fn handle_precognitive(&self, request: &Request) -> Response {
        for handler in self.handlers.before_handlers() {
            match AssertUnwindSafe(handler.handle(request)).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::warn!(
                        handler = handler.name(),
                        error = %error,
                        "Before handler failed during precognitive request"
                    );
                    return self.respond_to_error(error.as_ref(), request);
                }
                Err(panic) => {
                    let message = panic_message(panic);
                    tracing::error!(
                        handler = handler.name(),
                        error = %message,
                        "Before handler panicked during precognitive request"
                    );
                    return error_response(&message);
                }
            }
        }

        success_response(request)
    }

    fn respond_to_error(&self, error: &RaisedError, request: &Request) -> Response {
        match self.parse_error(error) {
            Some(data) => validation_errors_response(&data, request),
            None => {
                tracing::error!(error = %error, "No error parser matched");
                error_response(&error.to_string())
            }
        }
    }

    /// 依次尝试解析器，遇到第一个非空结果即停止
    pub fn parse_error(&self, error: &RaisedError) -> Option<ValidationErrorsData> {
        self.parsers.iter().enumerate().find_map(|(index, parser)| {
            let data = parser(error)?;
            tracing::debug!(parser = index, "Error parsed into validation errors");
            Some(data)
        })
    }
}

/// 依次执行中间件，第一个失败即停止，后续中间件不会启动
async fn run_sequence(
    handlers: &[Arc<dyn Middleware>],
    request: &Request,
    stage: &'static str,
) -> MiddlewareResult {
    for handler in handlers {
        handler.handle(request).await.map_err(|e| {
            tracing::warn!(
                handler = handler.name(),
                stage = stage,
                error = %e,
                "Middleware failed"
            );
            e
        })?;
    }
    Ok(())
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic occurred".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{from_fn, main_fn};
    use crate::validation::FieldErrors;

    fn handler_with_failing_before(error: fn() -> BoxError) -> HandlerBundle<&'static str> {
        HandlerBundle::new(main_fn(|_| Box::pin(async { Ok::<_, BoxError>("ok") })))
            .before(from_fn(move |_| Err(error())))
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new("owned".to_string())), "owned");
        assert_eq!(panic_message(Box::new(42)), "Unknown panic occurred");
    }

    #[test]
    fn test_first_matching_parser_wins() {
        let handler = PrecognitiveHandler::new(
            handler_with_failing_before(|| "boom".into()),
            [
                ErrorParser::custom(|_| None),
                ErrorParser::custom(|_| Some(ValidationErrorsData::new("second"))),
                ErrorParser::custom(|_| Some(ValidationErrorsData::new("third"))),
            ],
        );

        let error: BoxError = "boom".into();
        assert_eq!(handler.parse_error(error.as_ref()).unwrap().message, "second");
    }

    #[test]
    fn test_no_parsers_means_no_match() {
        let handler: PrecognitiveHandler<&'static str> =
            PrecognitiveHandler::new(handler_with_failing_before(|| "boom".into()), []);

        let error: BoxError = Box::new(FieldErrors::field_error("name", "required"));
        assert!(handler.parse_error(error.as_ref()).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_accessors() {
        let handler = PrecognitiveHandler::new(
            HandlerBundle::new(main_fn(|_| Box::pin(async { Ok::<_, BoxError>(7) }))),
            [],
        );

        let completed = handler.handle(&Request::new()).await.unwrap();
        assert!(!completed.is_precognition());
        assert_eq!(completed.into_completed(), Some(7));

        let request = Request::new().with_header("Precognitive", "true");
        let precognition = handler.handle(&request).await.unwrap();
        assert!(precognition.is_precognition());
        assert_eq!(precognition.into_precognition().unwrap().status_code(), 204);
    }
}
