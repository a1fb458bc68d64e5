//! # Runtime Configuration Module
//!
//! Selects the host target the routing layer adapts to.
//!
//! ## Environment Variables
//!
//! ### `WREN_TARGET`
//!
//! Host target identifier. Accepted values (case-insensitive):
//! - `server` (aliases `deno`, `connection`): handlers receive connection info
//! - `worker` (aliases `cloudflare`, `bindings`): handlers receive host
//!   bindings and an execution context
//!
//! Default: `server`
//!
//! ## TOML
//!
//! The same settings can come from a file:
//!
//! ```toml
//! target = "worker"
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use wren::runtime_config::RoutingConfig;
//! use wren::host::Target;
//!
//! let config = RoutingConfig::from_toml_str(r#"target = "cloudflare""#).unwrap();
//! assert_eq!(config.target().unwrap(), Target::Worker);
//! ```
//!
//! An unknown target is not rejected while loading; it fails when the
//! configuration is turned into a handler, so a misconfigured deployment
//! fails at startup rather than on the first request.

use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::host::Target;

/// Environment variable holding the target identifier.
pub const TARGET_ENV: &str = "WREN_TARGET";

/// Target used when none is configured.
pub const DEFAULT_TARGET: &str = "server";

/// Routing configuration loaded from the environment or a TOML document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Host target identifier, see [`Target`].
    pub target: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

impl RoutingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        match env::var(TARGET_ENV) {
            Ok(val) if !val.trim().is_empty() => RoutingConfig { target: val },
            _ => RoutingConfig::default(),
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&input)
    }

    /// Resolve the configured identifier.
    pub fn target(&self) -> Result<Target> {
        self.target.parse()
    }
}
