//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type and the [`RateLimit`]
//! information SendGrid attaches to every response.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

/// Rate limit information parsed from the `X-RateLimit-*` headers.
///
/// # Example
///
/// ```rust
/// use sendgrid_contacts::clients::RateLimit;
///
/// let limit = RateLimit::parse("600", "599", "1700000000").unwrap();
/// assert_eq!(limit.limit, 600);
/// assert_eq!(limit.remaining, 599);
/// assert_eq!(limit.reset, 1_700_000_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed in the current window (`X-RateLimit-Limit`).
    pub limit: u32,
    /// Requests left in the current window (`X-RateLimit-Remaining`).
    pub remaining: u32,
    /// Unix time at which the window resets (`X-RateLimit-Reset`).
    pub reset: i64,
}

impl RateLimit {
    /// Parses the three rate limit header values.
    ///
    /// Returns `None` if any value is not a number.
    #[must_use]
    pub fn parse(limit: &str, remaining: &str, reset: &str) -> Option<Self> {
        Some(Self {
            limit: limit.trim().parse().ok()?,
            remaining: remaining.trim().parse().ok()?,
            reset: reset.trim().parse().ok()?,
        })
    }

    /// Returns the reset time as a timestamp.
    #[must_use]
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset, 0).single()
    }

    /// Returns `true` if no requests are left in the current window.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// An HTTP response from the API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body; `Value::Null` when the body is empty.
    pub body: serde_json::Value,
    /// Rate limit information, when all three headers are present.
    pub rate_limit: Option<RateLimit>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the rate limit headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let first = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(String::as_str)
        };

        let rate_limit = match (
            first("x-ratelimit-limit"),
            first("x-ratelimit-remaining"),
            first("x-ratelimit-reset"),
        ) {
            (Some(limit), Some(remaining), Some(reset)) => {
                RateLimit::parse(limit, remaining, reset)
            }
            _ => None,
        };

        Self {
            code,
            headers,
            body,
            rate_limit,
        }
    }

    /// Returns `true` for any status below 400.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code < 400
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Builds a readable error message from a SendGrid error body.
    ///
    /// SendGrid reports failures as `{"errors": [{"field": ..., "message": ...}]}`.
    /// The messages are joined with `"; "`, prefixed by their field when one
    /// is given. Other bodies are rendered as compact JSON.
    #[must_use]
    pub fn error_message(&self) -> String {
        let messages: Vec<String> = self
            .body
            .get("errors")
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|error| {
                        let message = error.get("message")?.as_str()?;
                        match error.get("field").and_then(serde_json::Value::as_str) {
                            Some(field) if !field.is_empty() => Some(format!("{field}: {message}")),
                            _ => Some(message.to_string()),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        if !messages.is_empty() {
            return messages.join("; ");
        }
        if self.body.is_null() {
            return String::new();
        }
        self.body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect()
    }

    #[test]
    fn test_is_ok_below_400() {
        for code in [200, 201, 204, 302, 399] {
            assert!(HttpResponse::new(code, HashMap::new(), json!({})).is_ok());
        }
        for code in [400, 404, 429, 500] {
            assert!(!HttpResponse::new(code, HashMap::new(), json!({})).is_ok());
        }
    }

    #[test]
    fn test_rate_limit_parsed_from_headers() {
        let response = HttpResponse::new(
            200,
            headers(&[
                ("x-ratelimit-limit", "600"),
                ("x-ratelimit-remaining", "0"),
                ("x-ratelimit-reset", "1700000000"),
            ]),
            json!({}),
        );

        let limit = response.rate_limit.unwrap();
        assert_eq!(limit.limit, 600);
        assert!(limit.is_exhausted());
        assert_eq!(limit.reset_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_rate_limit_absent_when_header_missing() {
        let response = HttpResponse::new(
            200,
            headers(&[("x-ratelimit-limit", "600")]),
            json!({}),
        );
        assert!(response.rate_limit.is_none());
    }

    #[test]
    fn test_rate_limit_rejects_garbage() {
        assert!(RateLimit::parse("a", "1", "2").is_none());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(200, headers(&[("x-request-id", "abc")]), json!({}));
        assert_eq!(response.header("X-Request-Id"), Some("abc"));
    }

    #[test]
    fn test_error_message_joins_sendgrid_errors() {
        let response = HttpResponse::new(
            400,
            HashMap::new(),
            json!({"errors": [
                {"field": "name", "message": "Returned if list name is a duplicate"},
                {"field": null, "message": "request body is invalid"}
            ]}),
        );

        assert_eq!(
            response.error_message(),
            "name: Returned if list name is a duplicate; request body is invalid"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        let response = HttpResponse::new(500, HashMap::new(), json!({"raw_body": "oops"}));
        assert_eq!(response.error_message(), r#"{"raw_body":"oops"}"#);

        let response = HttpResponse::new(500, HashMap::new(), serde_json::Value::Null);
        assert_eq!(response.error_message(), "");
    }
}
