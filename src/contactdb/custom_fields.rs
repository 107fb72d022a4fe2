//! Custom field resource.

use serde::{Deserialize, Serialize};

use crate::clients::{decode, HttpMethod, RestClient};
use crate::contactdb::ContactsError;

const CUSTOM_FIELDS_PATH: &str = "contactdb/custom_fields";
const RESERVED_FIELDS_PATH: &str = "contactdb/reserved_fields";

/// Data type of a custom field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    #[default]
    Text,
    Number,
    Date,
    /// Only used by the reserved `lists` field.
    Set,
    /// A type this library does not know about.
    #[serde(other)]
    Other,
}

/// A field that can be added to recipients.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CustomField {
    #[serde(skip_serializing, default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: CustomFieldType,
}

impl CustomField {
    /// Creates an unsaved custom field.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: CustomFieldType) -> Self {
        Self {
            id: None,
            name: name.into(),
            field_type,
        }
    }
}

/// A custom field value carried by a recipient.
///
/// When a recipient is sent to the API, each value is written as a
/// top-level key named after the field.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CustomFieldValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<CustomFieldType>,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl CustomFieldValue {
    /// Creates a value for the named field.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            id: None,
            name: name.into(),
            field_type: None,
            value: value.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CustomFieldCollection {
    #[serde(default)]
    custom_fields: Vec<CustomField>,
}

#[derive(Debug, Deserialize)]
struct ReservedFieldCollection {
    #[serde(default)]
    reserved_fields: Vec<CustomField>,
}

/// Operations on custom fields.
#[derive(Debug, Clone, Copy)]
pub struct CustomFieldsClient<'a> {
    rest: &'a RestClient,
}

impl<'a> CustomFieldsClient<'a> {
    pub(crate) const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// Creates a custom field and stores the assigned id on `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn create(&self, field: &mut CustomField) -> Result<(), ContactsError> {
        let created: CustomField = self
            .rest
            .send_json(HttpMethod::Post, CUSTOM_FIELDS_PATH, Some(&*field), Vec::new())
            .await?;
        tracing::debug!(id = ?created.id, name = %created.name, "Created custom field");
        *field = created;
        Ok(())
    }

    /// Lists all custom fields.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn list(&self) -> Result<Vec<CustomField>, ContactsError> {
        let collection: CustomFieldCollection =
            self.rest.get_json(CUSTOM_FIELDS_PATH, Vec::new()).await?;
        Ok(collection.custom_fields)
    }

    /// Retrieves a custom field.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no field has this id.
    pub async fn get(&self, id: u64) -> Result<CustomField, ContactsError> {
        let path = format!("{CUSTOM_FIELDS_PATH}/{id}");
        let response = self
            .rest
            .get(&path, Vec::new())
            .await
            .map_err(|e| ContactsError::for_id(e, "CustomField", id))?;
        Ok(decode(&path, response)?)
    }

    /// Deletes a custom field.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no field has this id.
    pub async fn delete(&self, id: u64) -> Result<(), ContactsError> {
        let path = format!("{CUSTOM_FIELDS_PATH}/{id}");
        self.rest
            .delete(&path, None)
            .await
            .map_err(|e| ContactsError::for_id(e, "CustomField", id))?;
        Ok(())
    }

    /// Lists the fields reserved by SendGrid.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn reserved_fields(&self) -> Result<Vec<CustomField>, ContactsError> {
        let collection: ReservedFieldCollection =
            self.rest.get_json(RESERVED_FIELDS_PATH, Vec::new()).await?;
        Ok(collection.reserved_fields)
    }
}
