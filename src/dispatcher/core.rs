#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_clone)]

use std::iter;
use std::sync::Arc;

use tracing::debug;

use super::params::{merge_params, parse_body, parse_query};
use crate::context::Context;
use crate::error::{BoxError, Result};
use crate::handler::{handler_fn, BoxedHandler, HandlerFuture, Request, Response};
use crate::middleware::{compose, BoxedMiddleware, Middleware};
use crate::response;
use crate::router::{RouteInfo, RouteTable};
use crate::routes::{build_routes, Route};

/// Middleware that resolves the request against a route table.
///
/// On a match it fills in `ctx.params` and `ctx.files` and calls the matched
/// handler. Without a match the request continues to the inner handler, which
/// in a [`Dispatcher`] is the 404 fallback.
pub struct RouteFinder {
    table: Arc<RouteTable>,
}

impl RouteFinder {
    #[must_use]
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }
}

impl Middleware for RouteFinder {
    fn wrap(&self, fallback: BoxedHandler) -> BoxedHandler {
        let table = Arc::clone(&self.table);
        Arc::new(move |req: Request, ctx: Context| {
            let table = Arc::clone(&table);
            let fallback = Arc::clone(&fallback);
            async move { resolve(&table, fallback, req, ctx).await }
        })
    }
}

async fn resolve(
    table: &RouteTable,
    fallback: BoxedHandler,
    mut req: Request,
    mut ctx: Context,
) -> std::result::Result<Response, BoxError> {
    let Some(found) = table.find(req.method(), req.uri().path()) else {
        debug!(
            method = %req.method(),
            path = %req.uri().path(),
            "No route matched"
        );
        return fallback.call(req, ctx).await;
    };

    let query = parse_query(req.uri().query());
    let body = parse_body(&mut req).await?;
    ctx.params = merge_params(query, &found.path_params, body.params);
    ctx.files = body.files;

    debug!(
        route_pattern = %found.template,
        route_method = %found.method,
        param_count = ctx.params.len(),
        file_count = ctx.files.len(),
        "Dispatching to route handler"
    );
    found.handler.call(req, ctx).await
}

/// Handler answering `404 Not Found` with a plain-text body.
#[must_use]
pub fn not_found_handler() -> BoxedHandler {
    handler_fn(|_req, _ctx| async { Ok(response::not_found()) })
}

/// The composed request pipeline: global middleware, then route resolution,
/// then the 404 fallback.
///
/// Cloning is cheap and clones share the same table and handlers.
#[derive(Clone)]
pub struct Dispatcher {
    pipeline: BoxedHandler,
    table: Arc<RouteTable>,
}

impl Dispatcher {
    /// Wrap an already built table. `middleware` runs for every request,
    /// matched or not, first element outermost.
    #[must_use]
    pub fn new(table: RouteTable, middleware: &[BoxedMiddleware]) -> Self {
        let table = Arc::new(table);
        let finder: BoxedMiddleware = Arc::new(RouteFinder::new(Arc::clone(&table)));
        let chain: Vec<BoxedMiddleware> = middleware
            .iter()
            .cloned()
            .chain(iter::once(finder))
            .collect();
        Self {
            pipeline: compose(&chain, not_found_handler()),
            table,
        }
    }

    /// Build the table from declarations and wrap it.
    pub fn build(
        routes: impl IntoIterator<Item = Route>,
        middleware: &[BoxedMiddleware],
    ) -> Result<Self> {
        Ok(Self::new(build_routes(routes)?, middleware))
    }

    /// Run one request through the pipeline.
    pub fn dispatch(&self, req: Request, ctx: Context) -> HandlerFuture {
        self.pipeline.call(req, ctx)
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn describe(&self) -> &[RouteInfo] {
        self.table.describe()
    }

    /// The whole pipeline as a single handler.
    #[must_use]
    pub fn as_handler(&self) -> BoxedHandler {
        Arc::clone(&self.pipeline)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.table.len())
            .finish_non_exhaustive()
    }
}
