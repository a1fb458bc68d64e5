//! # Router Module
//!
//! Path matching and route lookup.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling path templates (`/users/:id`, `/static/*path`) into anchored matchers
//! - Keeping composed handlers in per-method buckets plus an `ANY` bucket
//! - Matching incoming requests in registration order and extracting raw path parameters
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: At build time each template is turned into a regex. A
//!    malformed template is rejected here, never while serving.
//!
//! 2. **Matching**: For each request the bucket of the request method is
//!    scanned in registration order, then the `ANY` bucket. The first match
//!    wins; there is no specificity ranking.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use wren::router::{RouteMethod, RouteTable, HttpMethod};
//! use wren::{handler_fn, response, routes::Meta};
//!
//! # fn main() -> Result<(), wren::Error> {
//! let mut table = RouteTable::new();
//! let show = handler_fn(|_req, _ctx| async { Ok(response::ok("user")) });
//! table.add(HttpMethod::Get.into(), "/users/:id", show, Arc::new(Meta::default()))?;
//!
//! let found = table.find(&Method::GET, "/users/42").expect("route");
//! assert_eq!(found.get_path_param("id"), Some("42"));
//! assert_eq!(found.method, RouteMethod::Exact(HttpMethod::Get));
//! # Ok(())
//! # }
//! ```

mod core;
mod method;
mod pattern;
#[cfg(test)]
mod tests;

pub use self::core::{RouteEntry, RouteInfo, RouteMatch, RouteTable};
pub use method::{HttpMethod, RouteMethod};
pub use pattern::{ParamVec, Pattern, MAX_INLINE_PARAMS};
