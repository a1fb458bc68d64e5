use std::sync::Arc;
use std::time::Instant;

use http::HeaderValue;
use tracing::{info, info_span, warn, Instrument};

use super::Middleware;
use crate::context::Context;
use crate::handler::{BoxedHandler, Request};
use crate::ids::RequestId;

/// Header carrying the request id in and out.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps each request in a `request` span and logs its outcome.
///
/// The request id is taken from `x-request-id` when it holds a valid ULID and
/// generated otherwise. It is stored in the request extensions for handlers and
/// echoed back on the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        Arc::new(move |mut req: Request, ctx: Context| {
            let inner = Arc::clone(&inner);
            let request_id = RequestId::from_header_or_new(
                req.headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok()),
            );
            req.extensions_mut().insert(request_id);

            let span = info_span!(
                "request",
                method = %req.method(),
                path = %req.uri().path(),
                request_id = %request_id,
            );
            async move {
                let start = Instant::now();
                let result = inner.call(req, ctx).await;
                let latency_us = start.elapsed().as_micros() as u64;
                match result {
                    Ok(mut res) => {
                        info!(status = res.status().as_u16(), latency_us, "Request completed");
                        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                            res.headers_mut().insert(REQUEST_ID_HEADER, value);
                        }
                        Ok(res)
                    }
                    Err(err) => {
                        warn!(error = %err, latency_us, "Request failed");
                        Err(err)
                    }
                }
            }
            .instrument(span)
        })
    }
}
