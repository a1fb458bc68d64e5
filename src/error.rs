//! Error types shared by route construction and request dispatch.
//!
//! Construction-time failures (bad path templates, unknown host targets, bad
//! configuration) surface from `build` functions and never at request time.
//! Body parsing failures surface from the dispatch future and are handed to the
//! host untouched; the dispatcher does not convert them into responses.

use thiserror::Error;

/// Failure type carried by every handler future.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building a router or parsing a request body.
#[derive(Debug, Error)]
pub enum Error {
    /// The path template could not be compiled.
    #[error("invalid path template '{template}': {reason}")]
    InvalidPattern {
        /// The template as declared.
        template: String,
        /// Why compilation rejected it.
        reason: String,
    },

    /// The host target identifier is not one this crate can adapt to.
    #[error("unsupported host target '{0}' (expected 'server' or 'worker')")]
    UnsupportedTarget(String),

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host body stream failed while it was being read.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] BoxError),

    /// The request declared a JSON body that does not parse.
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The request declared a multipart body that does not parse.
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] multer::Error),
}

impl Error {
    pub(crate) fn invalid_pattern(template: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
