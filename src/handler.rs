use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::body::Body;
use crate::context::Context;
use crate::error::BoxError;

/// Incoming request as seen by handlers.
pub type Request = http::Request<Body>;

/// Outgoing response produced by handlers.
pub type Response = http::Response<Body>;

/// Future returned by every handler invocation.
pub type HandlerFuture = BoxFuture<'static, Result<Response, BoxError>>;

/// Unit of request-to-response logic.
///
/// Any `Fn(Request, Context) -> impl Future<Output = Result<Response, BoxError>>`
/// closure or function is a handler. Handlers are immutable and shared across
/// concurrent requests through [`BoxedHandler`].
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request, ctx: Context) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    fn call(&self, req: Request, ctx: Context) -> HandlerFuture {
        Box::pin(self(req, ctx))
    }
}

/// Shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Erase a handler closure into a [`BoxedHandler`].
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(Request, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    Arc::new(f)
}
