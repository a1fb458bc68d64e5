use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::handler::BoxedHandler;
use crate::middleware::{compose, BoxedMiddleware};
use crate::router::HttpMethod;

/// Descriptive route metadata, carried through to [`RouteTable::describe`].
///
/// [`RouteTable::describe`]: crate::router::RouteTable::describe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub responses: Map<String, Value>,
}

impl Meta {
    #[must_use]
    pub fn summary(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Self::default()
        }
    }
}

/// Ordered middleware terminated by a handler.
#[derive(Clone)]
pub struct Pipeline {
    middleware: Vec<BoxedMiddleware>,
    handler: BoxedHandler,
}

impl Pipeline {
    /// `middleware` in outermost-first order, followed by `handler`.
    pub fn new(middleware: impl IntoIterator<Item = BoxedMiddleware>, handler: BoxedHandler) -> Self {
        Self {
            middleware: middleware.into_iter().collect(),
            handler,
        }
    }

    #[must_use]
    pub fn middleware(&self) -> &[BoxedMiddleware] {
        &self.middleware
    }

    #[must_use]
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Compose into a single handler, first middleware outermost.
    #[must_use]
    pub fn compose(&self) -> BoxedHandler {
        compose(&self.middleware, self.handler.clone())
    }

    pub(crate) fn into_parts(self) -> (Vec<BoxedMiddleware>, BoxedHandler) {
        (self.middleware, self.handler)
    }
}

/// A bare handler or a pipeline, as accepted for each method of a mapping.
#[derive(Clone)]
pub enum Endpoint {
    Handler(BoxedHandler),
    Pipeline(Pipeline),
}

impl Endpoint {
    pub(crate) fn into_parts(self) -> (Vec<BoxedMiddleware>, BoxedHandler) {
        match self {
            Endpoint::Handler(handler) => (Vec::new(), handler),
            Endpoint::Pipeline(pipeline) => pipeline.into_parts(),
        }
    }
}

impl From<BoxedHandler> for Endpoint {
    fn from(handler: BoxedHandler) -> Self {
        Endpoint::Handler(handler)
    }
}

impl From<Pipeline> for Endpoint {
    fn from(pipeline: Pipeline) -> Self {
        Endpoint::Pipeline(pipeline)
    }
}

/// Per-method handlers sharing middleware and metadata.
///
/// Keys are method names. Only `GET`, `POST`, `PUT`, `PATCH` and `DELETE` are
/// registered; any other key is kept here but discarded when the route table
/// is built.
#[derive(Clone, Default)]
pub struct MethodMap {
    entries: Vec<(String, Endpoint)>,
    middleware: Vec<BoxedMiddleware>,
    meta: Meta,
}

impl MethodMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint for `key`, replacing an earlier one with the same key.
    #[must_use]
    pub fn on(mut self, key: impl Into<String>, endpoint: impl Into<Endpoint>) -> Self {
        let key = key.into();
        let endpoint = endpoint.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = endpoint,
            None => self.entries.push((key, endpoint)),
        }
        self
    }

    #[must_use]
    pub fn method(self, method: HttpMethod, endpoint: impl Into<Endpoint>) -> Self {
        self.on(method.as_str(), endpoint)
    }

    #[must_use]
    pub fn get(self, endpoint: impl Into<Endpoint>) -> Self {
        self.method(HttpMethod::Get, endpoint)
    }

    #[must_use]
    pub fn post(self, endpoint: impl Into<Endpoint>) -> Self {
        self.method(HttpMethod::Post, endpoint)
    }

    #[must_use]
    pub fn put(self, endpoint: impl Into<Endpoint>) -> Self {
        self.method(HttpMethod::Put, endpoint)
    }

    #[must_use]
    pub fn patch(self, endpoint: impl Into<Endpoint>) -> Self {
        self.method(HttpMethod::Patch, endpoint)
    }

    #[must_use]
    pub fn delete(self, endpoint: impl Into<Endpoint>) -> Self {
        self.method(HttpMethod::Delete, endpoint)
    }

    /// Append shared middleware; earlier additions wrap later ones.
    #[must_use]
    pub fn with_middleware(mut self, middleware: BoxedMiddleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Method keys in declaration order, including unrecognized ones.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub(crate) fn into_parts(self) -> (Vec<(String, Endpoint)>, Vec<BoxedMiddleware>, Meta) {
        (self.entries, self.middleware, self.meta)
    }
}

/// Shared middleware and metadata for the single-method constructors.
#[derive(Clone, Default)]
pub struct RouteOptions {
    pub middleware: Vec<BoxedMiddleware>,
    pub meta: Meta,
}

/// The three declaration shapes a route can take.
#[derive(Clone)]
pub enum RouteUnit {
    /// Registered for any method.
    Handler(BoxedHandler),
    /// Registered for any method.
    Pipeline(Pipeline),
    /// Registered once per recognized method key.
    Methods(MethodMap),
}

impl From<BoxedHandler> for RouteUnit {
    fn from(handler: BoxedHandler) -> Self {
        RouteUnit::Handler(handler)
    }
}

impl From<Pipeline> for RouteUnit {
    fn from(pipeline: Pipeline) -> Self {
        RouteUnit::Pipeline(pipeline)
    }
}

impl From<MethodMap> for RouteUnit {
    fn from(map: MethodMap) -> Self {
        RouteUnit::Methods(map)
    }
}

/// A route declaration: a path, what answers it and an optional nested route.
///
/// Route-level middleware wraps everything registered for this path, outside
/// any middleware shared by a [`MethodMap`] or owned by a [`Pipeline`].
#[derive(Clone)]
pub struct Route {
    path: String,
    unit: RouteUnit,
    middleware: Vec<BoxedMiddleware>,
    meta: Option<Meta>,
    child: Option<Box<Route>>,
}

impl Route {
    pub fn new(path: impl Into<String>, unit: impl Into<RouteUnit>) -> Self {
        Self {
            path: path.into(),
            unit: unit.into(),
            middleware: Vec::new(),
            meta: None,
            child: None,
        }
    }

    /// Append route-level middleware; earlier additions wrap later ones.
    #[must_use]
    pub fn with_middleware(mut self, middleware: BoxedMiddleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Set the metadata reported for every registration of this route. It
    /// takes precedence over the metadata of a [`MethodMap`].
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    #[must_use]
    pub fn with_options(self, options: RouteOptions) -> Self {
        let RouteOptions { middleware, meta } = options;
        middleware
            .into_iter()
            .fold(self, Route::with_middleware)
            .with_meta(meta)
    }

    /// Attach a nested route. It is registered right after this one, with its
    /// own path.
    #[must_use]
    pub fn with_child(mut self, child: Route) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn unit(&self) -> &RouteUnit {
        &self.unit
    }

    #[must_use]
    pub fn middleware(&self) -> &[BoxedMiddleware] {
        &self.middleware
    }

    #[must_use]
    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    #[must_use]
    pub fn child(&self) -> Option<&Route> {
        self.child.as_deref()
    }

    pub(crate) fn into_parts(self) -> RouteParts {
        RouteParts {
            path: self.path,
            unit: self.unit,
            middleware: self.middleware,
            meta: self.meta,
            child: self.child,
        }
    }
}

pub(crate) struct RouteParts {
    pub(crate) path: String,
    pub(crate) unit: RouteUnit,
    pub(crate) middleware: Vec<BoxedMiddleware>,
    pub(crate) meta: Option<Meta>,
    pub(crate) child: Option<Box<Route>>,
}

/// Declare a single-method route with shared middleware and metadata.
///
/// When `endpoint` is a pipeline, `options.middleware` wraps the pipeline's
/// own middleware. `HEAD` and `OPTIONS` are not mappable and produce a route
/// that registers nothing.
pub fn route(
    method: HttpMethod,
    path: impl Into<String>,
    endpoint: impl Into<Endpoint>,
    options: RouteOptions,
) -> Route {
    Route::new(path, MethodMap::new().method(method, endpoint)).with_options(options)
}

pub fn get(path: impl Into<String>, endpoint: impl Into<Endpoint>) -> Route {
    Route::new(path, MethodMap::new().get(endpoint))
}

pub fn post(path: impl Into<String>, endpoint: impl Into<Endpoint>) -> Route {
    Route::new(path, MethodMap::new().post(endpoint))
}

pub fn put(path: impl Into<String>, endpoint: impl Into<Endpoint>) -> Route {
    Route::new(path, MethodMap::new().put(endpoint))
}

pub fn patch(path: impl Into<String>, endpoint: impl Into<Endpoint>) -> Route {
    Route::new(path, MethodMap::new().patch(endpoint))
}

pub fn delete(path: impl Into<String>, endpoint: impl Into<Endpoint>) -> Route {
    Route::new(path, MethodMap::new().delete(endpoint))
}
