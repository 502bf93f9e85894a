//! 处理器模块
//!
//! 定义前置/后置中间件、主处理器以及处理器组合 [`HandlerBundle`]

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

use crate::error::BoxError;
use crate::request::Request;

pub type MiddlewareResult = Result<(), BoxError>;

/// 中间件 trait
///
/// 中间件只产生成功或失败，不产生业务结果。前置中间件同时也是预知请求中唯一会执行的逻辑
#[async_trait]
pub trait Middleware: Send + Sync {
    fn name(&self) -> &str {
        "anonymous"
    }

    async fn handle(&self, request: &Request) -> MiddlewareResult;
}

#[async_trait]
impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn handle(&self, request: &Request) -> MiddlewareResult {
        (**self).handle(request).await
    }
}

/// 主处理器 trait - 唯一产生业务结果的处理器
#[async_trait]
pub trait MainHandler<T>: Send + Sync {
    async fn call(&self, request: &Request) -> Result<T, BoxError>;
}

/// 同步闭包中间件
pub struct FnMiddleware<F> {
    name: &'static str,
    f: F,
}

impl<F> FnMiddleware<F> {
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

/// 用同步闭包创建中间件
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&Request) -> MiddlewareResult + Send + Sync,
{
    FnMiddleware {
        name: "anonymous",
        f,
    }
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&Request) -> MiddlewareResult + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn handle(&self, request: &Request) -> MiddlewareResult {
        (self.f)(request)
    }
}

/// 异步闭包中间件
pub struct AsyncFnMiddleware<F> {
    name: &'static str,
    f: F,
}

impl<F> AsyncFnMiddleware<F> {
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

/// 用返回 [`BoxFuture`] 的闭包创建中间件
///
/// ```ignore
/// let auth = from_async_fn(|request| Box::pin(async move {
///     check_token(request.header("Authorization")).await
/// }));
/// ```
pub fn from_async_fn<F>(f: F) -> AsyncFnMiddleware<F>
where
    F: for<'a> Fn(&'a Request) -> BoxFuture<'a, MiddlewareResult> + Send + Sync,
{
    AsyncFnMiddleware {
        name: "anonymous",
        f,
    }
}

#[async_trait]
impl<F> Middleware for AsyncFnMiddleware<F>
where
    F: for<'a> Fn(&'a Request) -> BoxFuture<'a, MiddlewareResult> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn handle(&self, request: &Request) -> MiddlewareResult {
        (self.f)(request).await
    }
}

/// 闭包主处理器
pub struct MainFn<F>(F);

/// 用返回 [`BoxFuture`] 的闭包创建主处理器
pub fn main_fn<T, F>(f: F) -> MainFn<F>
where
    F: for<'a> Fn(&'a Request) -> BoxFuture<'a, Result<T, BoxError>> + Send + Sync,
{
    MainFn(f)
}

#[async_trait]
impl<T, F> MainHandler<T> for MainFn<F>
where
    T: Send,
    F: for<'a> Fn(&'a Request) -> BoxFuture<'a, Result<T, BoxError>> + Send + Sync,
{
    async fn call(&self, request: &Request) -> Result<T, BoxError> {
        (self.0)(request).await
    }
}

/// “零个、一个或多个”中间件
#[derive(Clone, Default)]
pub enum HandlerList {
    #[default]
    Empty,
    Single(Arc<dyn Middleware>),
    Sequence(Vec<Arc<dyn Middleware>>),
}

impl HandlerList {
    /// 规范化为有序列表，顺序即执行顺序
    pub fn resolve(self) -> Vec<Arc<dyn Middleware>> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(handler) => vec![handler],
            Self::Sequence(handlers) => handlers,
        }
    }
}

impl<M: Middleware + 'static> From<M> for HandlerList {
    fn from(handler: M) -> Self {
        Self::Single(Arc::new(handler))
    }
}

impl From<Vec<Arc<dyn Middleware>>> for HandlerList {
    fn from(handlers: Vec<Arc<dyn Middleware>>) -> Self {
        Self::Sequence(handlers)
    }
}

impl FromIterator<Arc<dyn Middleware>> for HandlerList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Middleware>>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().collect())
    }
}

pub fn resolve_handlers(handlers: impl Into<HandlerList>) -> Vec<Arc<dyn Middleware>> {
    handlers.into().resolve()
}

/// 处理器组合：前置中间件、唯一的主处理器、后置中间件
pub struct HandlerBundle<T> {
    before: Vec<Arc<dyn Middleware>>,
    main: Arc<dyn MainHandler<T>>,
    after: Vec<Arc<dyn Middleware>>,
}

impl<T> HandlerBundle<T> {
    pub fn new(main: impl MainHandler<T> + 'static) -> Self {
        Self {
            before: Vec::new(),
            main: Arc::new(main),
            after: Vec::new(),
        }
    }

    pub fn before(mut self, handlers: impl Into<HandlerList>) -> Self {
        self.before = resolve_handlers(handlers);
        self
    }

    pub fn after(mut self, handlers: impl Into<HandlerList>) -> Self {
        self.after = resolve_handlers(handlers);
        self
    }

    pub fn before_handlers(&self) -> &[Arc<dyn Middleware>] {
        &self.before
    }

    pub fn main_handler(&self) -> &Arc<dyn MainHandler<T>> {
        &self.main
    }

    pub fn after_handlers(&self) -> &[Arc<dyn Middleware>] {
        &self.after
    }
}

impl<T> Clone for HandlerBundle<T> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            main: Arc::clone(&self.main),
            after: self.after.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Arc<dyn Middleware> {
        Arc::new(from_fn(|_| Ok(())))
    }

    #[test]
    fn test_resolve_empty() {
        assert!(resolve_handlers(HandlerList::Empty).is_empty());
        assert!(HandlerList::default().resolve().is_empty());
    }

    #[test]
    fn test_resolve_single_or_sequence() {
        let single = resolve_handlers(from_fn(|_| Ok(())));
        assert_eq!(single.len(), 1);

        let sequence = resolve_handlers(vec![noop()]);
        assert_eq!(sequence.len(), 1);
    }

    #[test]
    fn test_resolve_preserves_order() {
        let first: Arc<dyn Middleware> = Arc::new(from_fn(|_| Ok(())).named("first"));
        let second: Arc<dyn Middleware> = Arc::new(from_fn(|_| Ok(())).named("second"));
        let third: Arc<dyn Middleware> = Arc::new(from_fn(|_| Ok(())).named("third"));

        let names: Vec<String> = [first, second, third]
            .into_iter()
            .collect::<HandlerList>()
            .resolve()
            .iter()
            .map(|handler| handler.name().to_string())
            .collect();

        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_fn_middleware_adapters() {
        let request = Request::new().with_header("Authorization", "token");

        let sync = from_fn(|request| match request.header("Authorization") {
            Some(_) => Ok(()),
            None => Err("missing token".into()),
        });
        assert!(sync.handle(&request).await.is_ok());
        assert!(sync.handle(&Request::new()).await.is_err());

        let async_handler = from_async_fn(|request| {
            Box::pin(async move {
                let result: MiddlewareResult = match request.header("Authorization") {
                    Some("token") => Ok(()),
                    _ => Err("bad token".into()),
                };
                result
            })
        });
        assert!(async_handler.handle(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_main_fn() {
        let main = main_fn(|request| {
            Box::pin(async move { Ok::<_, BoxError>(request.body().unwrap_or_default().len()) })
        });

        let request = Request::new().with_body("hello");
        assert_eq!(main.call(&request).await.unwrap(), 5);
    }
}
