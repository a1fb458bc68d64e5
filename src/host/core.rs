use std::sync::Arc;

use tracing::{error, info};

use super::target::Target;
use crate::context::{BackgroundTask, Bindings, ConnInfo, Context, ExecutionContext};
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::handler::{HandlerFuture, Request};
use crate::middleware::BoxedMiddleware;
use crate::router::RouteInfo;
use crate::routes::Route;
use crate::runtime_config::RoutingConfig;

/// Execution context for server-style hosts.
///
/// Background tasks are returned unchanged on success. A failing task is
/// logged and its error is passed on to whoever awaits the returned future.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ExecutionContext for PassThrough {
    fn wait_until(&self, task: BackgroundTask) -> BackgroundTask {
        Box::pin(async move {
            task.await
                .inspect_err(|e| error!(error = %e, "Background task failed"))
        })
    }
}

/// Two-argument host entry point: request plus connection info.
///
/// Each call gets a fresh [`Context`] carrying the connection info, empty
/// bindings and a [`PassThrough`] execution context. Failures from the
/// pipeline are logged and returned, never turned into a response.
#[derive(Clone)]
pub struct ServerHandler {
    dispatcher: Dispatcher,
    execution: Arc<dyn ExecutionContext>,
}

impl ServerHandler {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            execution: Arc::new(PassThrough),
        }
    }

    pub fn call(&self, req: Request, conn_info: ConnInfo) -> HandlerFuture {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let ctx = Context::new(Some(conn_info), Bindings::new(), Arc::clone(&self.execution));
        let response = self.dispatcher.dispatch(req, ctx);
        Box::pin(async move {
            response.await.inspect_err(|e| {
                error!(
                    method = %method,
                    path = %path,
                    remote_addr = %conn_info.remote_addr,
                    error = %e,
                    "Request handling failed"
                );
            })
        })
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl std::fmt::Debug for ServerHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandler")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// Three-argument host entry point: request, host bindings and the host's
/// execution context, both handed to the pipeline unchanged.
#[derive(Clone, Debug)]
pub struct WorkerHandler {
    dispatcher: Dispatcher,
}

impl WorkerHandler {
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn call(
        &self,
        req: Request,
        bindings: Bindings,
        execution: Arc<dyn ExecutionContext>,
    ) -> HandlerFuture {
        let ctx = Context::new(None, bindings, execution);
        self.dispatcher.dispatch(req, ctx)
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl Dispatcher {
    #[must_use]
    pub fn into_server(self) -> ServerHandler {
        ServerHandler::new(self)
    }

    #[must_use]
    pub fn into_worker(self) -> WorkerHandler {
        WorkerHandler::new(self)
    }
}

/// The adapter selected by a [`Target`].
#[derive(Clone, Debug)]
pub enum HostHandler {
    Server(ServerHandler),
    Worker(WorkerHandler),
}

impl HostHandler {
    #[must_use]
    pub fn target(&self) -> Target {
        match self {
            HostHandler::Server(_) => Target::Server,
            HostHandler::Worker(_) => Target::Worker,
        }
    }

    #[must_use]
    pub fn as_server(&self) -> Option<&ServerHandler> {
        match self {
            HostHandler::Server(handler) => Some(handler),
            HostHandler::Worker(_) => None,
        }
    }

    #[must_use]
    pub fn as_worker(&self) -> Option<&WorkerHandler> {
        match self {
            HostHandler::Worker(handler) => Some(handler),
            HostHandler::Server(_) => None,
        }
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        match self {
            HostHandler::Server(handler) => handler.dispatcher(),
            HostHandler::Worker(handler) => handler.dispatcher(),
        }
    }

    #[must_use]
    pub fn describe(&self) -> &[RouteInfo] {
        self.dispatcher().describe()
    }
}

/// Options for [`Routing::build`].
#[derive(Clone, Default)]
pub struct RoutingOptions {
    /// Global middleware, first element outermost. Runs for every request,
    /// including those that end in the 404 fallback.
    pub middleware: Vec<BoxedMiddleware>,
    pub target: Target,
}

/// Entry point turning route declarations into a host handler.
pub struct Routing;

impl Routing {
    /// Build the route table, compose the pipeline and adapt it to
    /// `options.target`. Fails on the first malformed path template.
    pub fn build(
        routes: impl IntoIterator<Item = Route>,
        options: RoutingOptions,
    ) -> Result<HostHandler> {
        let RoutingOptions { middleware, target } = options;
        let dispatcher = Dispatcher::build(routes, &middleware)?;

        info!(
            target_shape = %target,
            routes_count = dispatcher.table().len(),
            global_middleware = middleware.len(),
            "Routing ready"
        );

        Ok(match target {
            Target::Server => HostHandler::Server(dispatcher.into_server()),
            Target::Worker => HostHandler::Worker(dispatcher.into_worker()),
        })
    }

    /// Like [`Routing::build`], with the target taken from configuration.
    /// An unknown target identifier fails before any route is compiled.
    pub fn from_config(
        routes: impl IntoIterator<Item = Route>,
        middleware: Vec<BoxedMiddleware>,
        config: &RoutingConfig,
    ) -> Result<HostHandler> {
        let target = config.target()?;
        Self::build(routes, RoutingOptions { middleware, target })
    }
}
