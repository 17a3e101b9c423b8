//! Content API errors

use thiserror::Error;

/// Failures talking to the Prismic API
#[derive(Error, Debug)]
pub enum PrismicError {
    /// Transport failure (DNS, connect, timeout, ...)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected shape
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },

    /// No document of that type carries the given uid
    #[error("{document_type} document not found with uid {uid}")]
    NotFound { document_type: String, uid: String },

    /// The API root listed no master ref
    #[error("no master ref published by {0}")]
    NoMasterRef(String),

    /// The configured endpoint is not a valid URL
    #[error("invalid endpoint {0:?}")]
    InvalidEndpoint(String),

    /// A pagination cursor that is not a valid URL
    #[error("invalid pagination cursor {0:?}")]
    InvalidCursor(String),

    /// A pagination cursor pointing outside the configured repository
    #[error("pagination cursor {0:?} does not belong to the configured repository")]
    ForeignCursor(String),
}

impl PrismicError {
    /// Whether this error means the requested document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, PrismicError::NotFound { .. })
    }
}

/// A specialized Result type for content API calls.
pub type Result<T> = std::result::Result<T, PrismicError>;
