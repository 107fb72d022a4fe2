//! HTTP client for SendGrid API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests with optional retry handling.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ContactsConfig;

/// Fixed retry wait time in seconds.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Upper bound on a rate-limit driven wait, in seconds.
pub const MAX_RETRY_WAIT_TIME: u64 = 60;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the SendGrid API.
///
/// The client handles:
/// - URL construction from the configured base URL
/// - Default headers: bearer authorization, JSON content type, User-Agent
/// - Status code mapping (`>= 400` is an error)
/// - Retry logic for 429 and 500 responses when a request allows it
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use sendgrid_contacts::{ApiKey, ContactsConfig};
/// use sendgrid_contacts::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = ContactsConfig::builder()
///     .api_key(ApiKey::new("SG.key").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "contactdb/lists")
///     .build()
///     .unwrap();
///
/// let response = client.request(request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(config: &ContactsConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a new HTTP client around an existing reqwest client.
    ///
    /// Use this to share a connection pool or to plug in a client with
    /// custom middleware such as rate limiting.
    #[must_use]
    pub fn with_client(config: &ContactsConfig, client: reqwest::Client) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}SendGrid Contacts Library v{SDK_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", config.api_key().as_ref()),
        );

        Self {
            client,
            base_url: config.base_url().as_ref().to_string(),
            default_headers,
            timeout: config.timeout(),
        }
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - A network error occurs (`Network`)
    /// - The status code is `>= 400` (`Response`)
    /// - Retries are exhausted (`MaxRetries`)
    /// - A success body is not valid JSON (`InvalidJson`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!(
            "{}/{}",
            self.base_url,
            request.path.trim_start_matches('/')
        );

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Patch => self.client.patch(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &self.default_headers {
                req_builder = req_builder.header(key, value);
            }

            if !request.query.is_empty() {
                req_builder = req_builder.query(&request.query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            if let Some(timeout) = self.timeout {
                req_builder = req_builder.timeout(timeout);
            }

            tracing::debug!(
                method = %request.http_method,
                path = %request.path,
                attempt = tries,
                "Sending request to SendGrid"
            );

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await?;

            tracing::debug!(status = code, path = %request.path, "Received response");

            let body = Self::parse_body(code, &body_text)?;
            let response = HttpResponse::new(code, res_headers, body);

            if response.is_ok() {
                return Ok(response);
            }

            let message = response.error_message();

            let should_retry = code == 429 || code == 500;
            if !should_retry || request.tries == 1 {
                return Err(HttpError::Response(HttpResponseError { code, message }));
            }

            if tries >= request.tries {
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: request.tries,
                    message,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code, chrono::Utc::now().timestamp());
            tracing::warn!(
                status = code,
                path = %request.path,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying SendGrid request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Parses a response body.
    ///
    /// Empty bodies become `Null`. Error responses that are not JSON keep
    /// their raw text under `raw_body`; success responses must be JSON.
    fn parse_body(code: u16, body_text: &str) -> Result<serde_json::Value, HttpError> {
        if body_text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        match serde_json::from_str(body_text) {
            Ok(value) => Ok(value),
            Err(_) if code >= 400 => Ok(serde_json::json!({ "raw_body": body_text })),
            Err(source) => Err(HttpError::InvalidJson { code, source }),
        }
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay.
    ///
    /// A 429 waits until `X-RateLimit-Reset` when that is in the future,
    /// capped at [`MAX_RETRY_WAIT_TIME`]. Everything else waits a fixed
    /// [`RETRY_WAIT_TIME`].
    fn calculate_retry_delay(response: &HttpResponse, status: u16, now: i64) -> Duration {
        if status == 429 {
            if let Some(limit) = response.rate_limit {
                if let Ok(wait) = u64::try_from(limit.reset.saturating_sub(now)) {
                    if wait > 0 {
                        return Duration::from_secs(wait.min(MAX_RETRY_WAIT_TIME));
                    }
                }
            }
        }
        Duration::from_secs(RETRY_WAIT_TIME)
    }
}
