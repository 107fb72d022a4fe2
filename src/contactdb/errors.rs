//! Error types for contact database operations.
//!
//! Status codes are mapped to semantic variants where the caller can act
//! on them:
//!
//! - **404** on an id-addressed call: [`ContactsError::NotFound`]
//! - **Other failures**: [`ContactsError::Rest`], wrapping the REST and
//!   HTTP errors
//!
//! # Example
//!
//! ```rust,ignore
//! use sendgrid_contacts::contactdb::ContactsError;
//!
//! match client.lists().get(42).await {
//!     Ok(list) => println!("Found: {}", list.name),
//!     Err(ContactsError::NotFound { resource, id }) => {
//!         println!("{resource} with id {id} not found");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::clients::{HttpError, RestError};
use crate::contactdb::reconcile::ReconcileError;

/// Error type for contact database operations.
#[derive(Debug, Error)]
pub enum ContactsError {
    /// The addressed resource does not exist (HTTP 404).
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// The type name of the resource (e.g. "List").
        resource: &'static str,
        /// The id that was requested.
        id: String,
    },

    /// An operation needs a resource id that is not set.
    #[error("{resource} has no id; cannot {operation}")]
    MissingId {
        /// The type name of the resource.
        resource: &'static str,
        /// The operation being attempted.
        operation: &'static str,
    },

    /// A bulk response could not be mapped back onto its batch.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// A REST-level error occurred.
    #[error(transparent)]
    Rest(#[from] RestError),
}

impl ContactsError {
    /// Maps a REST error on an id-addressed call, turning 404 into
    /// [`ContactsError::NotFound`].
    pub(crate) fn for_id(error: RestError, resource: &'static str, id: impl fmt::Display) -> Self {
        if error.status() == Some(404) {
            return Self::NotFound {
                resource,
                id: id.to_string(),
            };
        }
        Self::Rest(error)
    }

    /// Returns the HTTP status code behind this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Rest(e) => e.status(),
            Self::MissingId { .. } | Self::Reconcile(_) => None,
        }
    }
}

impl From<HttpError> for ContactsError {
    fn from(error: HttpError) -> Self {
        Self::Rest(RestError::Http(error))
    }
}
