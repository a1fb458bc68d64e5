//! # Routes Module
//!
//! Declarative route definitions and the build step that turns them into a
//! [`RouteTable`](crate::router::RouteTable).
//!
//! A route is a path plus one of three shapes:
//!
//! - a bare handler, answering any method
//! - a [`Pipeline`] of middleware ending in a handler, answering any method
//! - a [`MethodMap`] of per-method handlers or pipelines with shared
//!   middleware and [`Meta`]
//!
//! ```rust
//! use wren::routes::{self, MethodMap, Pipeline, Route};
//! use wren::middleware::{AllowedMethods, BoxedMiddleware};
//! use wren::{handler_fn, response};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), wren::Error> {
//! let list = handler_fn(|_req, _ctx| async { Ok(response::ok("users")) });
//! let create = handler_fn(|_req, _ctx| async { Ok(response::created("user")) });
//! let health = handler_fn(|_req, _ctx| async { Ok(response::no_content()) });
//! let only_get: BoxedMiddleware = Arc::new(AllowedMethods::new([http::Method::GET]));
//!
//! let table = routes::build_routes([
//!     Route::new("/users", MethodMap::new().get(list).post(create)),
//!     Route::new("/health", Pipeline::new([only_get], health)),
//! ])?;
//! assert_eq!(table.len(), 3);
//! # Ok(())
//! # }
//! ```

mod build;
mod declaration;

pub use build::build_routes;
pub use declaration::{
    delete, get, patch, post, put, route, Endpoint, Meta, MethodMap, Pipeline, Route, RouteOptions,
    RouteUnit,
};
