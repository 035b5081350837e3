//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Errors produced by task cancellation, nested lookups, JSON sources and
/// configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    /// A key was absent at some level of a nested lookup, or the value at
    /// that level was not a mapping.
    #[error("key not found: {key:?}")]
    KeyNotFound {
        /// The key that could not be resolved.
        key: String,
    },

    /// A JSON source could not produce a body for the requested URL.
    #[error("HTTP error fetching {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// Status line or transport failure description.
        reason: String,
    },

    /// A fetched document did not have the expected shape.
    #[error("unexpected payload from {url}: expected {what} to be {expected}")]
    UnexpectedPayload {
        /// The URL the document was fetched from.
        url: String,
        /// Which part of the document was inspected.
        what: String,
        /// Description of the expected shape.
        expected: &'static str,
    },

    /// The task was canceled through its handle before it completed.
    #[error("task was canceled before completion")]
    Canceled,

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
