//! Per-request context handed to every handler.
//!
//! A [`Context`] is created fresh by the host adapter for each request, filled
//! in by the dispatcher (merged parameters and uploaded files) and then moved
//! through the middleware chain into the matched handler. It is never shared
//! between requests.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::error::BoxError;

/// Merged request parameters: query, then path, then body (later wins).
pub type Params = Map<String, Value>;

/// Uploaded files keyed by their form field name.
pub type Files = HashMap<String, UploadedFile>;

/// Background work registered through [`ExecutionContext::wait_until`].
pub type BackgroundTask = BoxFuture<'static, Result<(), BoxError>>;

/// A file part taken from a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client supplied file name.
    pub filename: String,
    /// Declared content type of the part, if any.
    pub content_type: Option<String>,
    /// Raw file payload.
    pub data: Bytes,
}

/// Connection metadata supplied by a server-style host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnInfo {
    pub local_addr: SocketAddr,
    pub remote_addr: SocketAddr,
}

/// Opaque host bindings (environment variables, storage handles, secrets)
/// supplied by a worker-style host.
#[derive(Clone, Default)]
pub struct Bindings {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding under `name`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Arc::new(value));
    }

    /// Builder form of [`Bindings::insert`].
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a binding by name and type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|v| v.downcast_ref::<T>())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();
        f.debug_struct("Bindings").field("names", &names).finish()
    }
}

/// Host hook for work that should outlive the response.
pub trait ExecutionContext: Send + Sync {
    /// Hand a background task to the host. The returned future resolves with
    /// the task's outcome for hosts that let callers observe it.
    fn wait_until(&self, task: BackgroundTask) -> BackgroundTask;
}

/// Request-scoped state visible to middleware and handlers.
pub struct Context {
    /// Merged query, path and body parameters.
    pub params: Params,
    /// Files uploaded through a multipart body.
    pub files: Files,
    /// Connection metadata, present for server-style hosts.
    pub conn_info: Option<ConnInfo>,
    /// Host bindings, empty for server-style hosts.
    pub bindings: Bindings,
    /// Host execution hooks.
    pub execution: Arc<dyn ExecutionContext>,
}

impl Context {
    /// A context with empty parameter and file state.
    pub fn new(
        conn_info: Option<ConnInfo>,
        bindings: Bindings,
        execution: Arc<dyn ExecutionContext>,
    ) -> Self {
        Self {
            params: Params::new(),
            files: Files::new(),
            conn_info,
            bindings,
            execution,
        }
    }

    /// Look up a merged parameter.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Look up a merged parameter that holds a string.
    #[inline]
    #[must_use]
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    #[inline]
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("params", &self.params)
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .field("conn_info", &self.conn_info)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_typed_lookups() {
        let bindings = Bindings::new()
            .with("API_TOKEN", String::from("secret"))
            .with("MAX_ITEMS", 25_u32);

        assert_eq!(bindings.get::<String>("API_TOKEN").map(String::as_str), Some("secret"));
        assert_eq!(bindings.get::<u32>("MAX_ITEMS"), Some(&25));
        assert!(bindings.get::<u64>("MAX_ITEMS").is_none());
        assert!(bindings.get::<String>("MISSING").is_none());
        assert!(bindings.contains("MAX_ITEMS"));
    }
}
