//! # Middleware Module
//!
//! Middleware are handler-to-handler transformers. A route pipeline
//! `[m1, m2, handler]` is composed as `m1(m2(handler))`: the first middleware
//! is outermost, runs first on the way in and last on the way out.
//!
//! Bundled middleware:
//! - [`AllowedMethods`] - answers `405` for methods outside an allow-list
//! - [`TracingMiddleware`] - request span, request id and outcome logging
//! - [`MetricsMiddleware`] - request, 404 and failure counters plus latency

mod allowed_methods;
mod core;
mod metrics;
mod tracing;

pub use allowed_methods::AllowedMethods;
pub use self::core::{compose, from_fn, BoxedMiddleware, Middleware, Next};
pub use metrics::MetricsMiddleware;
pub use self::tracing::{TracingMiddleware, REQUEST_ID_HEADER};
