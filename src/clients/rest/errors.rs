//! REST-specific error types.
//!
//! - [`RestError::InvalidPath`]: a path failed validation
//! - [`RestError::Http`]: wraps underlying HTTP errors
//! - [`RestError::Deserialization`]: a response body did not match the
//!   expected type
//!
//! # Example
//!
//! ```rust,ignore
//! use sendgrid_contacts::clients::rest::{RestClient, RestError};
//!
//! match client.get("contactdb/lists", Vec::new()).await {
//!     Ok(response) => println!("Lists: {}", response.body),
//!     Err(RestError::InvalidPath { path }) => println!("Invalid path: {path}"),
//!     Err(RestError::Http(e)) => println!("HTTP error: {e}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for REST API operations.
///
/// # Example
///
/// ```rust
/// use sendgrid_contacts::clients::rest::RestError;
///
/// let error = RestError::InvalidPath { path: "".to_string() };
/// assert!(error.to_string().contains("Invalid"));
/// ```
#[derive(Debug, Error)]
pub enum RestError {
    /// The REST API path is empty after normalization.
    #[error("Invalid REST API path: {path}")]
    InvalidPath {
        /// The invalid path that was provided.
        path: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body could not be decoded into the expected type.
    #[error("Failed to decode response from {path}: {source}")]
    Deserialization {
        /// The request path.
        path: String,
        /// The decode error.
        source: serde_json::Error,
    },
}

impl RestError {
    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            Self::InvalidPath { .. } | Self::Deserialization { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;

    #[test]
    fn test_invalid_path_error_message() {
        let error = RestError::InvalidPath {
            path: String::new(),
        };
        assert!(error.to_string().contains("Invalid REST API path"));
    }

    #[test]
    fn test_rest_error_wraps_http_errors() {
        let http_error = HttpError::Response(HttpResponseError {
            code: 404,
            message: "not found".to_string(),
        });

        let rest_error = RestError::from(http_error);
        assert!(rest_error.to_string().contains("404"));
        assert_eq!(rest_error.status(), Some(404));
    }

    #[test]
    fn test_deserialization_error_names_path() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let error = RestError::Deserialization {
            path: "contactdb/lists".to_string(),
            source,
        };
        assert!(error.to_string().contains("contactdb/lists"));
        assert_eq!(error.status(), None);
    }
}
