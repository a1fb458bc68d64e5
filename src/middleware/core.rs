use std::future::Future;
use std::sync::Arc;

use crate::context::Context;
use crate::error::BoxError;
use crate::handler::{BoxedHandler, Request, Response};

/// Handler-to-handler transformer.
///
/// `wrap` receives the inner handler and returns a new handler that may run
/// logic before and after calling it, or answer without calling it at all.
/// Any `Fn(BoxedHandler) -> BoxedHandler` closure is a middleware.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        self(inner)
    }
}

/// Shared, type-erased middleware.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// The inner handler as seen from a [`from_fn`] middleware.
pub type Next = BoxedHandler;

/// Apply `middleware` around `handler` so that the first element is outermost.
///
/// `[m1, m2, m3]` around `h` yields `m1(m2(m3(h)))`: `m1` runs first on the way
/// in and last on the way out.
#[must_use]
pub fn compose(middleware: &[BoxedMiddleware], handler: BoxedHandler) -> BoxedHandler {
    middleware
        .iter()
        .rev()
        .fold(handler, |inner, m| m.wrap(inner))
}

/// Build a middleware from an async function of `(request, context, next)`.
///
/// ```rust
/// use wren::middleware::{from_fn, Next};
/// use wren::{Context, Request};
///
/// let stamp = from_fn(|req: Request, ctx: Context, next: Next| async move {
///     let mut res = next.call(req, ctx).await?;
///     res.headers_mut().insert("x-powered-by", http::HeaderValue::from_static("wren"));
///     Ok(res)
/// });
/// # let _ = stamp;
/// ```
pub fn from_fn<F, Fut>(f: F) -> BoxedMiddleware
where
    F: Fn(Request, Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    Arc::new(FromFn { f: Arc::new(f) })
}

struct FromFn<F> {
    f: Arc<F>,
}

impl<F, Fut> Middleware for FromFn<F>
where
    F: Fn(Request, Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send + 'static,
{
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        let f = Arc::clone(&self.f);
        Arc::new(move |req: Request, ctx: Context| f(req, ctx, Arc::clone(&inner)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::context::{Bindings, ExecutionContext};
    use crate::handler::handler_fn;
    use crate::host::PassThrough;
    use crate::response;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> BoxedMiddleware {
        let log = Arc::clone(log);
        from_fn(move |req, ctx, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("{name}:in"));
                let res = next.call(req, ctx).await;
                log.lock().unwrap().push(format!("{name}:out"));
                res
            }
        })
    }

    fn ctx() -> Context {
        let execution: Arc<dyn ExecutionContext> = Arc::new(PassThrough);
        Context::new(None, Bindings::new(), execution)
    }

    #[tokio::test]
    async fn compose_applies_first_middleware_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handler_log = Arc::clone(&log);
        let handler = handler_fn(move |_req, _ctx| {
            let log = Arc::clone(&handler_log);
            async move {
                log.lock().unwrap().push("handler".to_string());
                Ok(response::ok("done"))
            }
        });

        let chain = compose(
            &[recorder(&log, "m1"), recorder(&log, "m2"), recorder(&log, "m3")],
            handler,
        );
        chain.call(Request::new(Body::empty()), ctx()).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["m1:in", "m2:in", "m3:in", "handler", "m3:out", "m2:out", "m1:out"]
        );
    }

    #[tokio::test]
    async fn closure_middleware_can_short_circuit() {
        let deny: BoxedMiddleware = Arc::new(|_inner: BoxedHandler| {
            handler_fn(|_req, _ctx| async { Ok(response::forbidden("no")) })
        });
        let handler = handler_fn(|_req, _ctx| async { Ok(response::ok("unreachable")) });

        let res = compose(&[deny], handler)
            .call(Request::new(Body::empty()), ctx())
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn compose_without_middleware_returns_the_handler() {
        let handler = handler_fn(|_req, _ctx| async { Ok(response::ok("x")) });
        let composed = compose(&[], Arc::clone(&handler));
        assert!(Arc::ptr_eq(&composed, &handler));
    }
}
