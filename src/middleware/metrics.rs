use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::StatusCode;

use super::Middleware;
use crate::context::Context;
use crate::handler::{BoxedHandler, Request};

/// Request counters collected by [`MetricsMiddleware`].
#[derive(Debug, Default)]
struct Counters {
    request_count: AtomicUsize,
    not_found_count: AtomicUsize,
    failure_count: AtomicUsize,
    total_latency_ns: AtomicU64,
}

/// Middleware for collecting request statistics.
///
/// All counters use relaxed atomics; clones share the same counters, so keep
/// one clone for reading while another is registered as middleware.
///
/// Metrics collected:
/// - Total request count
/// - Requests answered with 404 (including the router fallback)
/// - Requests whose handler chain failed
/// - Average latency
#[derive(Debug, Clone, Default)]
pub struct MetricsMiddleware {
    counters: Arc<Counters>,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of requests processed
    pub fn request_count(&self) -> usize {
        self.counters.request_count.load(Ordering::Relaxed)
    }

    /// Get the number of requests answered with 404
    pub fn not_found_count(&self) -> usize {
        self.counters.not_found_count.load(Ordering::Relaxed)
    }

    /// Get the number of requests whose handler chain returned an error
    pub fn failure_count(&self) -> usize {
        self.counters.failure_count.load(Ordering::Relaxed)
    }

    /// Calculate the average request latency
    ///
    /// Returns zero duration if no requests have been processed yet.
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count() as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.counters.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn wrap(&self, inner: BoxedHandler) -> BoxedHandler {
        let counters = Arc::clone(&self.counters);
        Arc::new(move |req: Request, ctx: Context| {
            let inner = Arc::clone(&inner);
            let counters = Arc::clone(&counters);
            async move {
                let start = Instant::now();
                let result = inner.call(req, ctx).await;
                counters.request_count.fetch_add(1, Ordering::Relaxed);
                counters
                    .total_latency_ns
                    .fetch_add(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
                match &result {
                    Ok(res) if res.status() == StatusCode::NOT_FOUND => {
                        counters.not_found_count.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(_) => {}
                    Err(_) => {
                        counters.failure_count.fetch_add(1, Ordering::Relaxed);
                    }
                }
                result
            }
        })
    }
}
