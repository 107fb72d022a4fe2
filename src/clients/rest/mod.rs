//! REST API client.
//!
//! - [`RestClient`]: path-normalizing wrapper over the HTTP client
//! - [`RestError`]: REST-specific error type
//! - [`to_body`] and [`decode`]: JSON helpers shared by resource clients

mod client;
mod errors;

pub use client::{decode, to_body, RestClient};
pub use errors::RestError;
