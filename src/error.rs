//! Error types and result handling for danmaku operations.
//!
//! All fallible operations in maku return a [`Result<T>`], a type alias for
//! `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Network Errors**: connection failures, timeouts, transport errors
//! - **Parse Errors**: unexpected response shapes or invalid data
//! - **Provider Errors**: provider-specific failures with context
//! - **Not Found**: missing providers in the registry
//! - **JSON Errors**: deserialization failures
//!
//! Note that "no danmaku available" is *not* an error anywhere in this crate:
//! providers report it as `Ok(None)`. An `Err` from a provider means the
//! remote service could not be reached or answered with something unusable,
//! which callers may treat as "no danmaku for now".
//!
//! # Examples
//!
//! ```rust
//! use maku::prelude::*;
//! use maku::error::{Error, Result};
//!
//! # fn example() -> Result<()> {
//! let registry = ProviderRegistry::builtin();
//!
//! match registry.create("nonexistent") {
//!     Ok(provider) => println!("created {}", provider.name()),
//!     Err(Error::NotFound(msg)) => println!("no such provider: {}", msg),
//!     Err(e) => println!("other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Type alias for Results with maku errors.
///
/// All public APIs in maku return this Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all maku operations.
///
/// Covers every failure condition a danmaku provider can run into, from
/// transport failures to malformed responses. Note the distinction drawn at
/// the provider boundary: a transport failure is an `Err`, while a remote
/// miss (no matching episode, empty comment list) is a plain `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-related errors from HTTP operations.
    ///
    /// Wraps errors from the underlying HTTP client (reqwest), including
    /// connection timeouts, DNS resolution failures, and transport errors.
    /// Providers surface this only after their retry budget is exhausted.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response data that cannot be interpreted as expected.
    ///
    /// Used when a response is transport-successful but structurally
    /// unusable, such as a non-UTF-8 body where text was expected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maku::Error;
    ///
    /// let error = Error::parse("Episode id is not numeric");
    /// ```
    #[error("Parse error: {0}")]
    Parse(String),

    /// Provider-specific errors with contextual information.
    ///
    /// Carries the identifier of the provider that failed together with a
    /// descriptive message, e.g. an HTTP error status from the remote
    /// service or a fetch attempted on a closed provider.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maku::Error;
    ///
    /// let error = Error::source("dandanplay", "HTTP 503 Service Unavailable");
    /// ```
    #[error("Provider error [{src}]: {message}")]
    Source { src: String, message: String },

    /// Resource not found errors.
    ///
    /// Returned by the registry when no factory is registered under the
    /// requested identifier.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON serialization and deserialization errors.
    ///
    /// Wraps serde_json errors raised while decoding remote responses.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker task join errors.
    ///
    /// Wraps errors from tokio tasks; session construction runs on the
    /// blocking worker pool and its panics surface here.
    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Generic error messages.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a parse error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maku::Error;
    ///
    /// let error = Error::parse("Unexpected response shape");
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates a provider-specific error with provider ID and message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maku::Error;
    ///
    /// let error = Error::source("dandanplay", "HTTP 429");
    /// ```
    pub fn source(src: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Source {
            src: src.into(),
            message: msg.into(),
        }
    }

    /// Creates a not found error with the given message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maku::Error;
    ///
    /// let error = Error::not_found("provider factory 'bilibili'");
    /// ```
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }
}
