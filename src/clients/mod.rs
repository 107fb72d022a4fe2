//! HTTP client types for SendGrid API communication.
//!
//! This module provides the transport layer: authenticated requests,
//! response parsing, status mapping and optional retries.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async HTTP client
//! - [`HttpRequest`]: a request to be sent to the API
//! - [`HttpResponse`]: a parsed response
//! - [`HttpMethod`]: supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`RateLimit`]: parsed `X-RateLimit-*` headers
//! - [`rest::RestClient`]: path-normalizing REST layer with typed helpers
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: waits until `X-RateLimit-Reset`, or 1 second
//! - **500 (Server Error)**: waits a fixed 1 second
//! - **Other errors**: returned immediately
//!
//! The default `tries` is 1, meaning no automatic retries.

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, RateLimit};

pub use rest::{decode, to_body, RestClient, RestError};
