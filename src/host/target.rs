use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Host calling convention the routing layer adapts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Two-argument shape: request plus connection info.
    #[default]
    Server,
    /// Three-argument shape: request, host bindings and execution context.
    Worker,
}

impl Target {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Target::Server => "server",
            Target::Worker => "worker",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = Error;

    /// Case-insensitive; `deno` and `connection` name the server shape,
    /// `cloudflare` and `bindings` the worker shape.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server" | "deno" | "connection" => Ok(Target::Server),
            "worker" | "cloudflare" | "bindings" => Ok(Target::Worker),
            _ => Err(Error::UnsupportedTarget(s.to_string())),
        }
    }
}
