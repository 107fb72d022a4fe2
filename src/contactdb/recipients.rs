//! Recipient resource.
//!
//! Recipients are the contacts stored in the contact database. Adds and
//! updates are bulk operations: ids assigned by the server are written back
//! onto the submitted recipients (see [`attach_ids`]).

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::clients::{decode, to_body, HttpMethod, RestClient};
use crate::contactdb::custom_fields::CustomFieldValue;
use crate::contactdb::lists::{List, ListCollection};
use crate::contactdb::reconcile::{attach_ids, AssignId, BulkResponse};
use crate::contactdb::segments::Condition;
use crate::contactdb::ContactsError;

const RECIPIENTS_PATH: &str = "contactdb/recipients";
const SEARCH_PATH: &str = "contactdb/recipients/search";

const BUILT_IN_KEYS: [&str; 4] = ["id", "email", "first_name", "last_name"];

/// A contact stored in the contact database.
///
/// Timestamps are read-only and never sent back to the API.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Recipient {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_emailed: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_clicked: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_opened: Option<DateTime<Utc>>,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldValue>,
}

impl Recipient {
    /// Creates an unsaved recipient with an email address.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Adds a custom field value.
    ///
    /// Fields named `id`, `email`, `first_name` or `last_name` are not sent,
    /// since those keys belong to the recipient itself.
    #[must_use]
    pub fn with_custom_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.custom_fields.push(CustomFieldValue::new(name, value));
        self
    }

    /// Returns the value of a custom field by name.
    #[must_use]
    pub fn custom_field(&self, name: &str) -> Option<&serde_json::Value> {
        self.custom_fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }
}

// Custom field values go on the wire as top-level keys.
impl Serialize for Recipient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        map.serialize_entry("email", &self.email)?;
        if let Some(first_name) = &self.first_name {
            map.serialize_entry("first_name", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            map.serialize_entry("last_name", last_name)?;
        }
        for field in &self.custom_fields {
            if BUILT_IN_KEYS.contains(&field.name.as_str()) {
                tracing::warn!(field = %field.name, "Skipping custom field that shadows a recipient key");
                continue;
            }
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}

impl AssignId for Recipient {
    fn assign_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// A field/value pair for [`RecipientsClient::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub field_name: String,
    pub field_value: String,
}

impl SearchTerm {
    #[must_use]
    pub fn new(field_name: impl Into<String>, field_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecipientCollection {
    #[serde(default)]
    pub(crate) recipients: Vec<Recipient>,
}

#[derive(Debug, Deserialize)]
struct RecipientCount {
    recipient_count: u64,
}

#[derive(Debug, Serialize)]
struct ConditionSearch<'a> {
    list_id: u64,
    conditions: &'a [Condition],
}

/// Operations on recipients.
#[derive(Debug, Clone, Copy)]
pub struct RecipientsClient<'a> {
    rest: &'a RestClient,
}

impl<'a> RecipientsClient<'a> {
    pub(crate) const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// Adds recipients in bulk.
    ///
    /// On return, every recipient that was created or updated carries its
    /// server-assigned id. Failed and unchanged recipients are left alone;
    /// check the returned [`BulkResponse`] for them.
    ///
    /// An empty batch returns an empty response without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails and
    /// [`ContactsError::Reconcile`] if the response is malformed.
    pub async fn add(&self, recipients: &mut [Recipient]) -> Result<BulkResponse, ContactsError> {
        self.bulk(HttpMethod::Post, recipients).await
    }

    /// Updates recipients in bulk, matched by email.
    ///
    /// Ids are reconciled exactly as for [`RecipientsClient::add`].
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails and
    /// [`ContactsError::Reconcile`] if the response is malformed.
    pub async fn update(
        &self,
        recipients: &mut [Recipient],
    ) -> Result<BulkResponse, ContactsError> {
        self.bulk(HttpMethod::Patch, recipients).await
    }

    async fn bulk(
        &self,
        method: HttpMethod,
        recipients: &mut [Recipient],
    ) -> Result<BulkResponse, ContactsError> {
        if recipients.is_empty() {
            return Ok(BulkResponse::default());
        }

        let response: BulkResponse = self
            .rest
            .send_json(method, RECIPIENTS_PATH, Some(&*recipients), Vec::new())
            .await?;

        let assigned = attach_ids(recipients, Some(&response))?;
        tracing::debug!(
            %method,
            submitted = recipients.len(),
            assigned,
            errors = response.error_count,
            "Reconciled bulk recipient response"
        );

        Ok(response)
    }

    /// Deletes recipients by id.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn delete(&self, ids: &[String]) -> Result<(), ContactsError> {
        self.rest
            .delete(RECIPIENTS_PATH, Some(to_body(ids)?))
            .await?;
        Ok(())
    }

    /// Deletes a single recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no recipient has this id.
    pub async fn delete_one(&self, id: &str) -> Result<(), ContactsError> {
        self.rest
            .delete(&recipient_path(id), None)
            .await
            .map_err(|e| ContactsError::for_id(e, "Recipient", id))?;
        Ok(())
    }

    /// Lists one page of recipients.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn list(&self, page: u32, page_size: u32) -> Result<Vec<Recipient>, ContactsError> {
        let collection: RecipientCollection = self
            .rest
            .get_json(
                RECIPIENTS_PATH,
                vec![
                    ("page".to_string(), page.to_string()),
                    ("page_size".to_string(), page_size.to_string()),
                ],
            )
            .await?;
        Ok(collection.recipients)
    }

    /// Retrieves a recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no recipient has this id.
    pub async fn get(&self, id: &str) -> Result<Recipient, ContactsError> {
        let path = recipient_path(id);
        let response = self
            .rest
            .get(&path, Vec::new())
            .await
            .map_err(|e| ContactsError::for_id(e, "Recipient", id))?;
        Ok(decode(&path, response)?)
    }

    /// Lists the lists a recipient is on.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no recipient has this id.
    pub async fn lists_for_recipient(&self, id: &str) -> Result<Vec<List>, ContactsError> {
        let path = format!("{}/lists", recipient_path(id));
        let response = self
            .rest
            .get(&path, Vec::new())
            .await
            .map_err(|e| ContactsError::for_id(e, "Recipient", id))?;
        let collection: ListCollection = decode(&path, response)?;
        Ok(collection.lists)
    }

    /// Returns the number of billable recipients.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn billable_count(&self) -> Result<u64, ContactsError> {
        self.fetch_count("contactdb/recipients/billable_count").await
    }

    /// Returns the total number of recipients.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn count(&self) -> Result<u64, ContactsError> {
        self.fetch_count("contactdb/recipients/count").await
    }

    async fn fetch_count(&self, path: &str) -> Result<u64, ContactsError> {
        let count: RecipientCount = self.rest.get_json(path, Vec::new()).await?;
        Ok(count.recipient_count)
    }

    /// Finds recipients matching field criteria.
    ///
    /// Each term becomes a query parameter, e.g. `email=example.com`.
    /// Date fields take unix timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn search(&self, criteria: &[SearchTerm]) -> Result<Vec<Recipient>, ContactsError> {
        let query = criteria
            .iter()
            .map(|term| (term.field_name.clone(), term.field_value.clone()))
            .collect();
        let collection: RecipientCollection = self.rest.get_json(SEARCH_PATH, query).await?;
        Ok(collection.recipients)
    }

    /// Finds recipients on a list matching segment-style conditions.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn search_list_with_conditions(
        &self,
        list_id: u64,
        conditions: &[Condition],
    ) -> Result<Vec<Recipient>, ContactsError> {
        let body = ConditionSearch {
            list_id,
            conditions,
        };
        let collection: RecipientCollection = self
            .rest
            .send_json(HttpMethod::Post, SEARCH_PATH, Some(&body), Vec::new())
            .await?;
        Ok(collection.recipients)
    }
}

fn recipient_path(id: &str) -> String {
    format!("{RECIPIENTS_PATH}/{}", urlencoding::encode(id))
}
