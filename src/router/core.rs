//! Route table - hot path for request routing.
//!
//! Entries are kept per method bucket in registration order. Lookup is a
//! linear scan of the request method's bucket followed by the `ANY` bucket; the
//! first pattern that matches wins, so more specific paths must be registered
//! before more general ones.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use serde::Serialize;
use tracing::debug;

use super::method::{HttpMethod, RouteMethod};
use super::pattern::{ParamVec, Pattern};
use crate::error::Result;
use crate::handler::BoxedHandler;
use crate::routes::Meta;

/// A compiled pattern paired with its fully composed handler.
#[derive(Clone)]
pub struct RouteEntry {
    pattern: Pattern,
    template: Arc<str>,
    handler: BoxedHandler,
    meta: Arc<Meta>,
}

impl RouteEntry {
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    #[must_use]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}

/// Result of a successful lookup.
#[derive(Clone)]
pub struct RouteMatch {
    /// Composed handler for the matched entry.
    pub handler: BoxedHandler,
    /// Raw path parameters, in template order.
    pub path_params: ParamVec,
    /// Bucket the entry was found in.
    pub method: RouteMethod,
    /// Template of the matched entry.
    pub template: Arc<str>,
    pub meta: Arc<Meta>,
}

impl RouteMatch {
    /// Get a path parameter by name.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("method", &self.method)
            .field("template", &self.template)
            .field("path_params", &self.path_params)
            .finish_non_exhaustive()
    }
}

/// Registration summary used for route listings.
#[derive(Debug, Clone, Serialize)]
pub struct RouteInfo {
    pub method: RouteMethod,
    pub path: String,
    pub meta: Arc<Meta>,
}

/// Method-bucketed route table.
///
/// Built once before serving and read-only afterwards, so lookups from
/// concurrent requests need no locking.
#[derive(Clone, Default)]
pub struct RouteTable {
    buckets: HashMap<RouteMethod, Vec<RouteEntry>>,
    registered: Vec<RouteInfo>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `path` and append it to the bucket for `method`.
    pub fn add(
        &mut self,
        method: RouteMethod,
        path: &str,
        handler: BoxedHandler,
        meta: Arc<Meta>,
    ) -> Result<()> {
        let pattern = Pattern::compile(path)?;
        debug!(method = %method, path = %path, "Route registered");

        self.registered.push(RouteInfo {
            method,
            path: path.to_string(),
            meta: Arc::clone(&meta),
        });
        self.buckets.entry(method).or_default().push(RouteEntry {
            template: Arc::from(path),
            pattern,
            handler,
            meta,
        });
        Ok(())
    }

    /// Find the handler for a request.
    ///
    /// Scans the bucket of the request method first and falls back to the
    /// `ANY` bucket. Methods without a bucket of their own only consult `ANY`.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        HttpMethod::from_http(method)
            .and_then(|m| self.find_in(RouteMethod::Exact(m), path))
            .or_else(|| self.find_in(RouteMethod::Any, path))
    }

    /// Scan a single bucket in registration order.
    #[must_use]
    pub fn find_in(&self, method: RouteMethod, path: &str) -> Option<RouteMatch> {
        let entries = self.buckets.get(&method)?;
        entries.iter().find_map(|entry| {
            let path_params = entry.pattern.matches(path)?;
            debug!(
                method = %method,
                path = %path,
                route_pattern = %entry.pattern.template(),
                path_params = ?path_params,
                "Route matched"
            );
            Some(RouteMatch {
                handler: Arc::clone(&entry.handler),
                path_params,
                method,
                template: Arc::clone(&entry.template),
                meta: Arc::clone(&entry.meta),
            })
        })
    }

    /// Entries of one bucket, in registration order.
    #[must_use]
    pub fn entries(&self, method: RouteMethod) -> &[RouteEntry] {
        self.buckets.get(&method).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every registration, in the order it was made.
    #[must_use]
    pub fn describe(&self) -> &[RouteInfo] {
        &self.registered
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}
