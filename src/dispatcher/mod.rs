//! # Dispatcher Module
//!
//! Turns a route table into a single request pipeline and fills in the
//! request context on the way to the matched handler.
//!
//! ## Request Flow
//!
//! 1. Global middleware runs, outermost first
//! 2. The route finder looks up the request method and path in the table
//! 3. On a match, query, path and body parameters are merged into
//!    `ctx.params` (later sources win) and uploaded files go to `ctx.files`
//! 4. The matched handler, already composed with its route middleware, runs
//! 5. Without a match the request falls through to a plain `404 Not Found`
//!
//! ## Parameter Typing
//!
//! Query string and url-encoded form values are type-inferred (`""` and
//! `"true"` become `true`, numeric text becomes a number). Path parameters
//! stay strings. JSON bodies are taken as parsed, and only JSON objects
//! contribute parameters.
//!
//! ```rust
//! use wren::dispatcher::Dispatcher;
//! use wren::host::PassThrough;
//! use wren::routes;
//! use wren::{handler_fn, response, Bindings, Body, Context};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let show = handler_fn(|_req, ctx: Context| async move {
//!     Ok(response::json(&serde_json::Value::Object(ctx.params)))
//! });
//! let dispatcher = Dispatcher::build([routes::get("/users/:id", show)], &[])?;
//!
//! let req = http::Request::get("/users/42?verbose=").body(Body::empty())?;
//! let ctx = Context::new(None, Bindings::new(), Arc::new(PassThrough));
//! let res = dispatcher.dispatch(req, ctx).await?;
//! assert_eq!(res.status(), http::StatusCode::OK);
//! # Ok(())
//! # }
//! ```

mod core;
mod params;

pub use self::core::{not_found_handler, Dispatcher, RouteFinder};
pub use params::{
    infer_value, merge_params, parse_body, parse_query, ParsedBody, FORM_URLENCODED, JSON,
    MULTIPART_FORM_DATA,
};
