//! # Host Module
//!
//! Adapts one compiled [`Dispatcher`](crate::dispatcher::Dispatcher) to the
//! calling convention of the host runtime.
//!
//! ## Targets
//!
//! - [`Target::Server`]: `call(request, conn_info)`. The context carries the
//!   connection info and a [`PassThrough`] execution context; failures are
//!   logged with `error!` and returned to the host.
//! - [`Target::Worker`]: `call(request, bindings, execution)`. Bindings and
//!   the execution context come from the host and are handed through as-is.
//!
//! Both shapes start every request with empty parameters and files and run
//! the same pipeline.
//!
//! ```rust
//! use std::net::SocketAddr;
//! use wren::context::ConnInfo;
//! use wren::host::{Routing, RoutingOptions, Target};
//! use wren::{handler_fn, response, routes, Body};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let hello = handler_fn(|_req, _ctx| async { Ok(response::ok("hello")) });
//! let host = Routing::build([routes::get("/", hello)], RoutingOptions::default())?;
//! assert_eq!(host.target(), Target::Server);
//!
//! let addr: SocketAddr = "127.0.0.1:8080".parse()?;
//! let conn = ConnInfo { local_addr: addr, remote_addr: addr };
//! let server = host.as_server().expect("server target");
//! let res = server.call(http::Request::get("/").body(Body::empty())?, conn).await?;
//! assert_eq!(res.status(), http::StatusCode::OK);
//! # Ok(())
//! # }
//! ```

mod core;
mod target;

pub use self::core::{
    HostHandler, PassThrough, Routing, RoutingOptions, ServerHandler, WorkerHandler,
};
pub use target::Target;
