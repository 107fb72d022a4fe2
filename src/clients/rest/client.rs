//! REST client implementation.
//!
//! This module provides the [`RestClient`] type, a thin layer over
//! [`HttpClient`] with path normalization and typed JSON helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::rest::RestError;
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::config::ContactsConfig;

/// REST API client for the SendGrid v3 API.
///
/// Provides `get`, `post`, `patch` and `delete` returning raw
/// [`HttpResponse`]s, and [`RestClient::send_json`] for typed calls.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use sendgrid_contacts::clients::RestClient;
///
/// let client = RestClient::new(&config)?;
///
/// let response = client.get("contactdb/lists", Vec::new()).await?;
///
/// let body = serde_json::json!({"name": "newsletter"});
/// let response = client.post("contactdb/lists", Some(body)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    tries: u32,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new REST client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &ContactsConfig) -> Result<Self, RestError> {
        Ok(Self::from_http_client(HttpClient::new(config)?))
    }

    /// Wraps an existing [`HttpClient`].
    #[must_use]
    pub const fn from_http_client(http_client: HttpClient) -> Self {
        Self {
            http_client,
            tries: 1,
        }
    }

    /// Sets how many times each request is attempted.
    ///
    /// Values above 1 retry 429 and 500 responses. A value of 0 is
    /// treated as 1.
    #[must_use]
    pub fn with_tries(mut self, tries: u32) -> Self {
        self.tries = tries.max(1);
        self
    }

    /// Returns the number of attempts made per request.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Get, path, None, query).await
    }

    /// Sends a POST request, with or without a body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn post(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Post, path, body, Vec::new())
            .await
    }

    /// Sends a PATCH request.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Patch, path, Some(body), Vec::new())
            .await
    }

    /// Sends a DELETE request. Bulk deletes carry their ids in the body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidPath`] if the path is empty.
    /// Returns [`RestError::Http`] for HTTP-level errors.
    pub async fn delete(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, RestError> {
        self.make_request(HttpMethod::Delete, path, body, Vec::new())
            .await
    }

    /// Sends a GET request and decodes the response body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the request fails and
    /// [`RestError::Deserialization`] if the response does not decode.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, RestError> {
        let response = self.get(path, query).await?;
        decode(path, response)
    }

    /// Sends a request with an optional serializable body and decodes the
    /// response body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the body cannot be serialized or the
    /// request fails, and [`RestError::Deserialization`] if the response
    /// does not decode into `T`.
    pub async fn send_json<B, T>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        query: Vec<(String, String)>,
    ) -> Result<T, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = body.map(to_body).transpose()?;
        let response = self.make_request(method, path, body, query).await?;
        decode(path, response)
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        query: Vec<(String, String)>,
    ) -> Result<HttpResponse, RestError> {
        let normalized_path = normalize_path(path)?;

        let mut builder = HttpRequest::builder(method, normalized_path)
            .query(query)
            .tries(self.tries);

        if let Some(body_value) = body {
            builder = builder.body(body_value);
        }

        let request = builder.build().map_err(HttpError::from)?;

        self.http_client.request(request).await.map_err(Into::into)
    }
}

/// Serializes a request body to JSON.
///
/// # Errors
///
/// Returns [`RestError::Http`] wrapping [`HttpError::Serialization`].
pub fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, RestError> {
    serde_json::to_value(body).map_err(|e| RestError::Http(HttpError::Serialization(e)))
}

/// Decodes a response body into `T`.
///
/// # Errors
///
/// Returns [`RestError::Deserialization`] if the body does not match `T`.
pub fn decode<T: DeserializeOwned>(path: &str, response: HttpResponse) -> Result<T, RestError> {
    serde_json::from_value(response.body).map_err(|source| RestError::Deserialization {
        path: path.to_string(),
        source,
    })
}

/// Normalizes a REST API path.
///
/// Strips leading and trailing `/` and rejects paths that end up empty.
fn normalize_path(path: &str) -> Result<String, RestError> {
    let path = path.trim_matches('/');

    if path.is_empty() {
        return Err(RestError::InvalidPath {
            path: String::new(),
        });
    }

    Ok(path.to_string())
}
