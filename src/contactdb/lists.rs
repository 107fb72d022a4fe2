//! List resource.
//!
//! A list is a named group of recipients.

use serde::{Deserialize, Serialize};

use crate::clients::{decode, to_body, HttpMethod, RestClient};
use crate::contactdb::recipients::{Recipient, RecipientCollection};
use crate::contactdb::{paging, ContactsError};

const LISTS_PATH: &str = "contactdb/lists";

/// A group of recipients.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct List {
    #[serde(skip_serializing, default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub recipient_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListCollection {
    #[serde(default)]
    pub(crate) lists: Vec<List>,
}

#[derive(Debug, Serialize)]
struct ListName<'a> {
    name: &'a str,
}

/// Operations on lists.
#[derive(Debug, Clone, Copy)]
pub struct ListsClient<'a> {
    rest: &'a RestClient,
}

impl<'a> ListsClient<'a> {
    pub(crate) const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// Creates a list.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails, e.g. when the
    /// name is already taken.
    pub async fn create(&self, name: &str) -> Result<List, ContactsError> {
        let list: List = self
            .rest
            .send_json(HttpMethod::Post, LISTS_PATH, Some(&ListName { name }), Vec::new())
            .await?;
        tracing::debug!(id = ?list.id, name, "Created list");
        Ok(list)
    }

    /// Lists all lists.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn list(&self) -> Result<Vec<List>, ContactsError> {
        let collection: ListCollection = self.rest.get_json(LISTS_PATH, Vec::new()).await?;
        Ok(collection.lists)
    }

    /// Deletes several lists at once.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn delete(&self, ids: &[u64]) -> Result<(), ContactsError> {
        self.rest.delete(LISTS_PATH, Some(to_body(ids)?)).await?;
        Ok(())
    }

    /// Deletes a single list.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no list has this id.
    pub async fn delete_one(&self, id: u64) -> Result<(), ContactsError> {
        self.rest
            .delete(&format!("{LISTS_PATH}/{id}"), None)
            .await
            .map_err(|e| ContactsError::for_id(e, "List", id))?;
        Ok(())
    }

    /// Retrieves a list.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no list has this id.
    pub async fn get(&self, id: u64) -> Result<List, ContactsError> {
        let path = format!("{LISTS_PATH}/{id}");
        let response = self
            .rest
            .get(&path, Vec::new())
            .await
            .map_err(|e| ContactsError::for_id(e, "List", id))?;
        Ok(decode(&path, response)?)
    }

    /// Renames a list and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::MissingId`] if `list.id` is unset and
    /// [`ContactsError::NotFound`] if no list has that id.
    pub async fn update(&self, list: &List) -> Result<List, ContactsError> {
        let id = list.id.ok_or(ContactsError::MissingId {
            resource: "List",
            operation: "update",
        })?;
        let path = format!("{LISTS_PATH}/{id}");
        let response = self
            .rest
            .patch(&path, to_body(&ListName { name: &list.name })?)
            .await
            .map_err(|e| ContactsError::for_id(e, "List", id))?;

        let mut updated: List = decode(&path, response)?;
        updated.id.get_or_insert(id);
        Ok(updated)
    }

    /// Lists one page of the recipients on a list.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no list has this id.
    pub async fn list_recipients(
        &self,
        list_id: u64,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Recipient>, ContactsError> {
        let path = format!("{LISTS_PATH}/{list_id}/recipients");
        let response = self
            .rest
            .get(&path, paging(page_size, page))
            .await
            .map_err(|e| ContactsError::for_id(e, "List", list_id))?;
        let collection: RecipientCollection = decode(&path, response)?;
        Ok(collection.recipients)
    }

    /// Adds saved recipients to a list.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::MissingId`] without sending anything if a
    /// recipient has no id.
    pub async fn add_recipients(
        &self,
        list_id: u64,
        recipients: &[Recipient],
    ) -> Result<(), ContactsError> {
        let ids = recipients
            .iter()
            .map(|r| {
                r.id.clone().ok_or(ContactsError::MissingId {
                    resource: "Recipient",
                    operation: "add to list",
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.add_recipients_by_ids(list_id, &ids).await
    }

    /// Adds recipients to a list by id.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no list has this id.
    pub async fn add_recipients_by_ids(
        &self,
        list_id: u64,
        recipient_ids: &[String],
    ) -> Result<(), ContactsError> {
        self.rest
            .post(
                &format!("{LISTS_PATH}/{list_id}/recipients"),
                Some(to_body(recipient_ids)?),
            )
            .await
            .map_err(|e| ContactsError::for_id(e, "List", list_id))?;
        Ok(())
    }

    /// Adds a single recipient to a list by id.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if the list or recipient does
    /// not exist.
    pub async fn add_recipient_by_id(
        &self,
        list_id: u64,
        recipient_id: &str,
    ) -> Result<(), ContactsError> {
        self.rest
            .post(&recipient_path(list_id, recipient_id), None)
            .await
            .map_err(|e| ContactsError::for_id(e, "List", list_id))?;
        Ok(())
    }

    /// Removes a saved recipient from a list.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::MissingId`] if the recipient has no id.
    pub async fn delete_recipient(
        &self,
        list_id: u64,
        recipient: &Recipient,
    ) -> Result<(), ContactsError> {
        let id = recipient.id.as_deref().ok_or(ContactsError::MissingId {
            resource: "Recipient",
            operation: "remove from list",
        })?;
        self.delete_recipient_by_id(list_id, id).await
    }

    /// Removes a recipient from a list by id.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if the list or recipient does
    /// not exist.
    pub async fn delete_recipient_by_id(
        &self,
        list_id: u64,
        recipient_id: &str,
    ) -> Result<(), ContactsError> {
        self.rest
            .delete(&recipient_path(list_id, recipient_id), None)
            .await
            .map_err(|e| ContactsError::for_id(e, "List", list_id))?;
        Ok(())
    }
}

fn recipient_path(list_id: u64, recipient_id: &str) -> String {
    format!(
        "{LISTS_PATH}/{list_id}/recipients/{}",
        urlencoding::encode(recipient_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_serializes_only_name() {
        let list = List {
            id: Some(1),
            name: "newsletter".to_string(),
            recipient_count: Some(10),
        };
        assert_eq!(serde_json::to_value(&list).unwrap(), json!({"name": "newsletter"}));
    }

    #[test]
    fn test_list_deserializes_response() {
        let list: List = serde_json::from_value(json!({
            "id": 1234, "name": "listname", "recipient_count": 0
        }))
        .unwrap();
        assert_eq!(list.id, Some(1234));
        assert_eq!(list.recipient_count, Some(0));
    }

    #[test]
    fn test_recipient_path_encodes_id() {
        assert_eq!(
            recipient_path(7, "a/b+c="),
            "contactdb/lists/7/recipients/a%2Fb%2Bc%3D"
        );
    }
}
