//! Configuration types for the contact database client.
//!
//! # Overview
//!
//! - [`ContactsConfig`]: all settings needed to talk to the API
//! - [`ContactsConfigBuilder`]: a builder for [`ContactsConfig`]
//! - [`ApiKey`]: a validated, log-safe API key
//! - [`BaseUrl`]: a validated API base URL
//!
//! # Example
//!
//! ```rust
//! use sendgrid_contacts::{ApiKey, BaseUrl, ContactsConfig};
//! use std::time::Duration;
//!
//! let config = ContactsConfig::builder()
//!     .api_key(ApiKey::new("SG.my-key").unwrap())
//!     .base_url(BaseUrl::new("https://api.sendgrid.com/v3").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.sendgrid.com/v3");
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{ApiKey, BaseUrl};

use crate::error::ConfigError;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "SENDGRID_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "SENDGRID_BASE_URL";

/// Configuration for the contact database client.
///
/// `ContactsConfig` is `Clone`, `Send` and `Sync`; build it once and share it.
#[derive(Clone, Debug)]
pub struct ContactsConfig {
    api_key: ApiKey,
    base_url: BaseUrl,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl ContactsConfig {
    /// Creates a new builder for constructing a `ContactsConfig`.
    #[must_use]
    pub fn builder() -> ContactsConfigBuilder {
        ContactsConfigBuilder::new()
    }

    /// Builds a configuration from the process environment.
    ///
    /// Reads the API key from `SENDGRID_API_KEY` and, if set, the base URL
    /// from `SENDGRID_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the key variable is unset,
    /// or a validation error if either value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| ConfigError::MissingEnvVar { name: API_KEY_ENV })?;

        let mut builder = Self::builder().api_key(ApiKey::new(key)?);
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(BaseUrl::new(url)?);
        }
        builder.build()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContactsConfig>();
};

/// Builder for [`ContactsConfig`].
///
/// Only `api_key` is required.
///
/// # Defaults
///
/// - `base_url`: `https://api.sendgrid.com/v3`
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None` (no deadline beyond reqwest's defaults)
#[derive(Debug, Default)]
pub struct ContactsConfigBuilder {
    api_key: Option<ApiKey>,
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl ContactsConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout applied to each request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`ContactsConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set.
    pub fn build(self) -> Result<ContactsConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        Ok(ContactsConfig {
            api_key,
            base_url: self.base_url.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
        })
    }
}
