//! Segment resource.
//!
//! A segment is a saved query over recipients, optionally scoped to one
//! list. Its membership is evaluated by SendGrid from the conditions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clients::{decode, to_body, HttpMethod, RestClient};
use crate::contactdb::recipients::{Recipient, RecipientCollection};
use crate::contactdb::{paging, ContactsError};

const SEGMENTS_PATH: &str = "contactdb/segments";

/// Comparison applied by a [`Condition`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Contains,
}

/// How a [`Condition`] combines with the one before it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AndOr {
    And,
    Or,
}

/// One clause of a segment query.
///
/// The first condition of a segment has no `and_or`; every later one
/// should have it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub value: String,
    pub operator: Operator,
    #[serde(
        default,
        serialize_with = "serialize_and_or",
        deserialize_with = "deserialize_and_or"
    )]
    pub and_or: Option<AndOr>,
}

impl Condition {
    /// Creates a leading condition.
    #[must_use]
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator,
            and_or: None,
        }
    }

    /// Sets how this condition joins the previous one.
    #[must_use]
    pub const fn joined_by(mut self, and_or: AndOr) -> Self {
        self.and_or = Some(and_or);
        self
    }
}

// The API sends and expects "" for a leading condition.
fn serialize_and_or<S: Serializer>(value: &Option<AndOr>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(and_or) => and_or.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

fn deserialize_and_or<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AndOr>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some("and") => Ok(Some(AndOr::And)),
        Some("or") => Ok(Some(AndOr::Or)),
        Some(other) => Err(serde::de::Error::unknown_variant(other, &["and", "or"])),
    }
}

/// A saved recipient query.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Segment {
    #[serde(skip_serializing, default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<u64>,
    #[serde(skip_serializing, default)]
    pub recipient_count: Option<u64>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Segment {
    /// Creates an unsaved segment.
    #[must_use]
    pub fn new(name: impl Into<String>, conditions: Vec<Condition>) -> Self {
        Self {
            name: name.into(),
            conditions,
            ..Self::default()
        }
    }

    /// Scopes the segment to a list.
    #[must_use]
    pub const fn on_list(mut self, list_id: u64) -> Self {
        self.list_id = Some(list_id);
        self
    }
}

#[derive(Debug, Deserialize)]
struct SegmentCollection {
    #[serde(default)]
    segments: Vec<Segment>,
}

/// Operations on segments.
#[derive(Debug, Clone, Copy)]
pub struct SegmentsClient<'a> {
    rest: &'a RestClient,
}

impl<'a> SegmentsClient<'a> {
    pub(crate) const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// Creates a segment and replaces `segment` with the stored version,
    /// including its id and recipient count.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn create(&self, segment: &mut Segment) -> Result<(), ContactsError> {
        let created: Segment = self
            .rest
            .send_json(HttpMethod::Post, SEGMENTS_PATH, Some(&*segment), Vec::new())
            .await?;
        tracing::debug!(id = ?created.id, name = %created.name, "Created segment");
        *segment = created;
        Ok(())
    }

    /// Lists all segments.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::Rest`] if the request fails.
    pub async fn list(&self) -> Result<Vec<Segment>, ContactsError> {
        let collection: SegmentCollection = self.rest.get_json(SEGMENTS_PATH, Vec::new()).await?;
        Ok(collection.segments)
    }

    /// Retrieves a segment.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no segment has this id.
    pub async fn get(&self, id: u64) -> Result<Segment, ContactsError> {
        let path = format!("{SEGMENTS_PATH}/{id}");
        let response = self
            .rest
            .get(&path, Vec::new())
            .await
            .map_err(|e| ContactsError::for_id(e, "Segment", id))?;
        Ok(decode(&path, response)?)
    }

    /// Updates a segment and replaces it with the stored version.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::MissingId`] if `segment.id` is unset and
    /// [`ContactsError::NotFound`] if no segment has that id.
    pub async fn update(&self, segment: &mut Segment) -> Result<(), ContactsError> {
        let id = segment.id.ok_or(ContactsError::MissingId {
            resource: "Segment",
            operation: "update",
        })?;
        let path = format!("{SEGMENTS_PATH}/{id}");
        let response = self
            .rest
            .patch(&path, to_body(&*segment)?)
            .await
            .map_err(|e| ContactsError::for_id(e, "Segment", id))?;

        let mut updated: Segment = decode(&path, response)?;
        updated.id.get_or_insert(id);
        *segment = updated;
        Ok(())
    }

    /// Deletes a segment. Its recipients are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no segment has this id.
    pub async fn delete(&self, id: u64) -> Result<(), ContactsError> {
        self.rest
            .delete(&format!("{SEGMENTS_PATH}/{id}"), None)
            .await
            .map_err(|e| ContactsError::for_id(e, "Segment", id))?;
        Ok(())
    }

    /// Lists one page of the recipients matching a segment.
    ///
    /// # Errors
    ///
    /// Returns [`ContactsError::NotFound`] if no segment has this id.
    pub async fn list_recipients(
        &self,
        id: u64,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Recipient>, ContactsError> {
        let path = format!("{SEGMENTS_PATH}/{id}/recipients");
        let response = self
            .rest
            .get(&path, paging(page_size, page))
            .await
            .map_err(|e| ContactsError::for_id(e, "Segment", id))?;
        let collection: RecipientCollection = decode(&path, response)?;
        Ok(collection.recipients)
    }
}
