//! # SendGrid Contacts
//!
//! A typed async client for the SendGrid Marketing Campaigns contact
//! database: recipients, lists, segments and custom fields.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ContactsConfig`] and [`ContactsConfigBuilder`]
//! - Validated newtypes for the API key and base URL
//! - An async HTTP client with optional retries and rate limit parsing
//! - One client per resource, reached through [`ContactsClient`]
//! - Bulk id reconciliation: after a bulk add or update, every recipient
//!   that was persisted carries its server-assigned id
//!
//! ## Quick Start
//!
//! ```rust
//! use sendgrid_contacts::{ApiKey, ContactsClient, ContactsConfig};
//!
//! let config = ContactsConfig::builder()
//!     .api_key(ApiKey::new("SG.your-api-key").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = ContactsClient::new(&config).unwrap();
//! ```
//!
//! ## Adding Recipients
//!
//! ```rust,ignore
//! use sendgrid_contacts::contactdb::Recipient;
//!
//! let mut batch = vec![
//!     Recipient::new("jane@example.com").with_first_name("Jane"),
//!     Recipient::new("not-an-email"),
//! ];
//!
//! let response = client.recipients().add(&mut batch).await?;
//! if !response.is_complete_success() {
//!     for &position in &response.error_indices {
//!         println!("{}: {:?}", batch[position].email, response.error_for(position));
//!     }
//! }
//! assert!(batch[0].id.is_some());
//! ```
//!
//! ## Segments
//!
//! ```rust,ignore
//! use sendgrid_contacts::contactdb::{AndOr, Condition, Operator, Segment};
//!
//! let mut segment = Segment::new(
//!     "Recent Millers",
//!     vec![
//!         Condition::new("last_name", Operator::Eq, "Miller"),
//!         Condition::new("last_clicked", Operator::Gt, "01/02/2015").joined_by(AndOr::And),
//!     ],
//! );
//! client.segments().create(&mut segment).await?;
//! println!("segment {:?} has {:?} recipients", segment.id, segment.recipient_count);
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and transport are passed explicitly
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Thread-safe**: all client and config types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod clients;
pub mod config;
pub mod contactdb;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, BaseUrl, ContactsConfig, ContactsConfigBuilder};
pub use error::ConfigError;

pub use contactdb::{ContactsClient, ContactsError};

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, RateLimit,
    RestClient, RestError,
};
