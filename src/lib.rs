//! # Wren
//!
//! **Wren** is a small request-routing and middleware-composition layer that
//! sits in front of whatever HTTP request/response primitive the host runtime
//! provides.
//!
//! ## Overview
//!
//! You declare routes (path, methods, handlers, optional middleware and
//! metadata); Wren builds them once into a read-only route table and composes
//! a single dispatch function that:
//!
//! - matches the request method and path against the table, in registration order
//! - merges query, path and body parameters into the request [`Context`]
//! - runs the matched handler through its middleware chain
//! - falls back to `404 Not Found` when nothing matches
//!
//! The same compiled pipeline can be called from a server-style host (request
//! plus connection info) or a worker-style host (request, bindings and an
//! execution context).
//!
//! ## Architecture
//!
//! - **[`router`]** - Path template compilation and the method-bucketed route table
//! - **[`routes`]** - Route declarations and the build step that reduces them to a table
//! - **[`middleware`]** - The middleware contract, composition and bundled middleware
//! - **[`dispatcher`]** - Route finding, parameter extraction and the 404 fallback
//! - **[`host`]** - Adapters for the two host calling conventions
//! - **[`response`]** - Status-code response builders
//! - **[`runtime_config`]** - Host target selection from the environment or TOML
//! - **[`telemetry`]** - `tracing` subscriber setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Adapter as ServerHandler / WorkerHandler
//!     participant Global as Global Middleware
//!     participant Finder as RouteFinder
//!     participant Table as RouteTable
//!     participant Route as Route Middleware
//!     participant Handler
//!
//!     Host->>Adapter: request (+ conn info | bindings, execution)
//!     Adapter->>Adapter: fresh Context (empty params, files)
//!     Adapter->>Global: request, context
//!     Global->>Finder: request, context
//!     Finder->>Table: find(method, path)
//!     alt no match
//!         Finder-->>Host: 404 Not Found
//!     else match
//!         Finder->>Finder: query + path + body params
//!         Finder->>Route: request, context
//!         Route->>Handler: request, context
//!         Handler-->>Host: response or error
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use wren::host::{Routing, RoutingOptions, Target};
//! use wren::routes::{self, MethodMap, Route};
//! use wren::{handler_fn, response, Bindings, Body, Context};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let show = handler_fn(|_req, ctx: Context| async move {
//!     let id = ctx.param_str("id").unwrap_or_default().to_string();
//!     Ok(response::ok(id))
//! });
//! let create = handler_fn(|_req, _ctx| async { Ok(response::created("")) });
//!
//! let host = Routing::build(
//!     [
//!         routes::get("/users/:id", show),
//!         Route::new("/users", MethodMap::new().post(create)),
//!     ],
//!     RoutingOptions { target: Target::Worker, ..Default::default() },
//! )?;
//!
//! let worker = host.as_worker().expect("worker target");
//! let req = http::Request::get("/users/42").body(Body::empty())?;
//! let res = worker.call(req, Bindings::new(), Arc::new(wren::host::PassThrough)).await?;
//! assert_eq!(res.status(), http::StatusCode::OK);
//! # Ok(())
//! # }
//! ```
//!
//! ## Matching Rules
//!
//! Routes are matched in **registration order**, not by specificity. Register
//! `/users/me` before `/users/:id` if both should be reachable. A request is
//! looked up in the bucket of its method first and in the `ANY` bucket second.
//!
//! ## Errors
//!
//! Malformed path templates and unknown host targets fail while building, never
//! while serving. Body parsing failures and handler errors are not turned into
//! responses; they propagate to the host as [`BoxError`].
//!
//! ## Logging
//!
//! Everything logs through `tracing`. Call [`telemetry::init_logging`] (driven
//! by `WREN_LOG_*` variables) or install your own subscriber.

pub mod body;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod host;
pub mod ids;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod runtime_config;
pub mod telemetry;

pub use body::Body;
pub use context::{Bindings, ConnInfo, Context, ExecutionContext, Params, UploadedFile};
pub use error::{BoxError, Error, Result};
pub use handler::{handler_fn, BoxedHandler, Handler, Request, Response};
pub use host::{HostHandler, Routing, RoutingOptions, Target};
pub use routes::{MethodMap, Pipeline, Route};
