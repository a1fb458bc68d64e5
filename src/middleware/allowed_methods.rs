use std::sync::Arc;

use http::Method;
use tracing::debug;

use super::Middleware;
use crate::context::Context;
use crate::handler::{BoxedHandler, Request};
use crate::response;

/// Rejects requests whose method is not in the allow-list with `405`.
///
/// Useful on routes registered without a method (the `ANY` bucket) that should
/// still only answer a subset of methods.
#[derive(Debug, Clone)]
pub struct AllowedMethods {
    methods: Arc<[Method]>,
}

impl AllowedMethods {
    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        Self {
            methods: methods.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }
}

impl Middleware for AllowedMethods {
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        let allowed = self.clone();
        Arc::new(move |req: Request, ctx: Context| {
            let inner = Arc::clone(&inner);
            let allowed = allowed.clone();
            async move {
                if !allowed.allows(req.method()) {
                    debug!(method = %req.method(), path = %req.uri().path(), "Method not allowed");
                    return Ok(response::method_not_allowed());
                }
                inner.call(req, ctx).await
            }
        })
    }
}
