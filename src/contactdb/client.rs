//! Entry point for contact database operations.

use crate::clients::RestClient;
use crate::config::ContactsConfig;
use crate::contactdb::custom_fields::CustomFieldsClient;
use crate::contactdb::lists::ListsClient;
use crate::contactdb::recipients::RecipientsClient;
use crate::contactdb::segments::SegmentsClient;
use crate::contactdb::ContactsError;

/// Client for the SendGrid contact database.
///
/// Resource operations are grouped behind accessors that borrow the
/// client, so one `ContactsClient` can serve any number of concurrent
/// calls.
///
/// # Example
///
/// ```rust,ignore
/// use sendgrid_contacts::{ContactsClient, ContactsConfig};
/// use sendgrid_contacts::contactdb::Recipient;
///
/// let client = ContactsClient::new(&ContactsConfig::from_env()?)?.with_tries(3);
///
/// let mut batch = vec![Recipient::new("jane@example.com")];
/// let response = client.recipients().add(&mut batch).await?;
/// println!("new: {}, id: {:?}", response.new_count, batch[0].id);
/// ```
#[derive(Debug, Clone)]
pub struct ContactsClient {
    rest: RestClient,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContactsClient>();
};

impl ContactsClient {
    /// Creates a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the HTTP client cannot be built.
    pub fn new(config: &ContactsConfig) -> Result<Self, ContactsError> {
        Ok(Self::from_rest_client(RestClient::new(config)?))
    }

    /// Wraps an existing [`RestClient`].
    #[must_use]
    pub const fn from_rest_client(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Sets how many times each request is attempted.
    #[must_use]
    pub fn with_tries(mut self, tries: u32) -> Self {
        self.rest = self.rest.with_tries(tries);
        self
    }

    /// Returns the underlying REST client.
    #[must_use]
    pub const fn rest_client(&self) -> &RestClient {
        &self.rest
    }

    /// Recipient operations.
    #[must_use]
    pub const fn recipients(&self) -> RecipientsClient<'_> {
        RecipientsClient::new(&self.rest)
    }

    /// List operations.
    #[must_use]
    pub const fn lists(&self) -> ListsClient<'_> {
        ListsClient::new(&self.rest)
    }

    /// Segment operations.
    #[must_use]
    pub const fn segments(&self) -> SegmentsClient<'_> {
        SegmentsClient::new(&self.rest)
    }

    /// Custom field operations.
    #[must_use]
    pub const fn custom_fields(&self) -> CustomFieldsClient<'_> {
        CustomFieldsClient::new(&self.rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;

    fn config() -> ContactsConfig {
        ContactsConfig::builder()
            .api_key(ApiKey::new("SG.test").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_uses_single_try() {
        let client = ContactsClient::new(&config()).unwrap();
        assert_eq!(client.rest_client().tries(), 1);
    }

    #[test]
    fn test_with_tries() {
        let client = ContactsClient::new(&config()).unwrap().with_tries(4);
        assert_eq!(client.rest_client().tries(), 4);
    }

    #[test]
    fn test_points_at_configured_base_url() {
        let client = ContactsClient::new(&config()).unwrap();
        assert_eq!(
            client.rest_client().http_client().base_url(),
            "https://api.sendgrid.com/v3"
        );
    }
}
