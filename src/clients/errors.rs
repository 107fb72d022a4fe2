//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: the API answered with a status code `>= 400`
//! - [`MaxHttpRetriesExceededError`]: retry attempts were exhausted
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: unified error type for everything above plus transport
//!   and JSON failures
//!
//! # Example
//!
//! ```rust,ignore
//! use sendgrid_contacts::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when the API responds with a status code `>= 400`.
///
/// `message` holds the messages from the SendGrid `errors` array joined
/// with `"; "`, or the raw body when the body is not in that shape.
///
/// # Example
///
/// ```rust
/// use sendgrid_contacts::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: "List ID does not exist".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "bad status code observed: 404: List ID does not exist");
/// ```
#[derive(Debug, Error)]
#[error("bad status code observed: {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Error message extracted from the response body.
    pub message: String,
}

/// Error returned when maximum retry attempts have been exhausted.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last status {code}: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Error message from the last response.
    pub message: String,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A PATCH request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET request was built with a body.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that forbids a body.
        method: String,
    },

    /// `tries` was set to zero.
    #[error("A request must be attempted at least once.")]
    ZeroTries,
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API returned a status code `>= 400`.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response carried a body that is not valid JSON.
    #[error("Invalid JSON in response with status {code}: {source}")]
    InvalidJson {
        /// The HTTP status code of the response.
        code: u16,
        /// The parse error.
        source: serde_json::Error,
    },

    /// A request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HttpError {
    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            Self::InvalidJson { code, .. } => Some(*code),
            Self::InvalidRequest(_) | Self::Network(_) | Self::Serialization(_) => None,
        }
    }
}
