//! Bulk response reconciliation.
//!
//! SendGrid's bulk recipient endpoints process every item on its own. Items
//! that fail or change nothing are reported by position, and identifiers
//! are returned only for the rest, in request order. Since an identifier
//! says nothing about which input produced it, the only way to map them
//! back is positional: walk the batch, skip reported positions, and hand
//! out identifiers in sequence.
//!
//! # Example
//!
//! ```rust
//! use sendgrid_contacts::contactdb::{attach_ids, BulkResponse, Recipient};
//!
//! let mut batch = vec![
//!     Recipient::new("a@example.com"),
//!     Recipient::new("not-an-email"),
//!     Recipient::new("c@example.com"),
//! ];
//! let response = BulkResponse {
//!     error_count: 1,
//!     error_indices: vec![1],
//!     persisted_recipients: vec!["id-a".to_string(), "id-c".to_string()],
//!     ..BulkResponse::default()
//! };
//!
//! let assigned = attach_ids(&mut batch, Some(&response)).unwrap();
//! assert_eq!(assigned, 2);
//! assert_eq!(batch[0].id.as_deref(), Some("id-a"));
//! assert_eq!(batch[1].id, None);
//! assert_eq!(batch[2].id.as_deref(), Some("id-c"));
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An item that can receive a server-assigned identifier.
pub trait AssignId {
    /// Stores the identifier on the item, replacing any previous one.
    fn assign_id(&mut self, id: String);
}

/// One failure reported by a bulk operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkError {
    /// Human-readable reason.
    #[serde(default)]
    pub message: String,
    /// Batch positions that failed for this reason.
    #[serde(default)]
    pub error_indices: Vec<usize>,
}

/// The response to a bulk recipient add or update.
///
/// A successful HTTP status does not mean every item succeeded; inspect
/// the counts and indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BulkResponse {
    /// Number of items that failed.
    pub error_count: u64,
    /// Batch positions (0-based) that failed.
    pub error_indices: Vec<usize>,
    /// Batch positions that were valid but caused no change.
    pub unmodified_indices: Vec<usize>,
    /// Number of recipients created.
    pub new_count: u64,
    /// Number of recipients updated.
    pub updated_count: u64,
    /// Identifiers of created or updated items, in batch order.
    pub persisted_recipients: Vec<String>,
    /// Failure details.
    pub errors: Vec<BulkError>,
}

impl BulkResponse {
    /// Returns `true` if no item failed.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.error_count == 0 && self.error_indices.is_empty()
    }

    /// Returns the failure message reported for a batch position, if any.
    #[must_use]
    pub fn error_for(&self, position: usize) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.error_indices.contains(&position))
            .map(|error| error.message.as_str())
    }
}

/// Errors raised while reconciling a bulk response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The response carries fewer identifiers than surviving items.
    #[error("bulk response has {available} persisted identifiers but {required} items need one")]
    MissingIdentifiers {
        /// Items that were neither failed nor unmodified.
        required: usize,
        /// Identifiers present in the response.
        available: usize,
    },
}

/// Attaches the persisted identifiers of a bulk response to the batch items
/// they belong to.
///
/// Positions listed in `error_indices` or `unmodified_indices` are skipped;
/// every other position takes the next identifier. Returns how many items
/// received an identifier.
///
/// A `None` response means the call failed outright and is a no-op. The
/// identifier count is checked before any item is touched, so on error the
/// batch is left as it was.
///
/// # Errors
///
/// Returns [`ReconcileError::MissingIdentifiers`] if the response has fewer
/// identifiers than surviving positions.
pub fn attach_ids<T: AssignId>(
    items: &mut [T],
    response: Option<&BulkResponse>,
) -> Result<usize, ReconcileError> {
    let Some(response) = response else {
        return Ok(0);
    };

    let errors: HashSet<usize> = response.error_indices.iter().copied().collect();
    let unmodified: HashSet<usize> = response.unmodified_indices.iter().copied().collect();
    let skipped = |position: usize| errors.contains(&position) || unmodified.contains(&position);

    let required = (0..items.len()).filter(|&p| !skipped(p)).count();
    let available = response.persisted_recipients.len();

    if available < required {
        return Err(ReconcileError::MissingIdentifiers {
            required,
            available,
        });
    }
    if available > required {
        tracing::warn!(
            required,
            available,
            "Bulk response has more persisted identifiers than surviving items"
        );
    }
    if errors.intersection(&unmodified).next().is_some() {
        tracing::warn!("Bulk response lists positions as both failed and unmodified");
    }

    let mut ids = response.persisted_recipients.iter();
    let mut assigned = 0;
    for (position, item) in items.iter_mut().enumerate() {
        if skipped(position) {
            continue;
        }
        if let Some(id) = ids.next() {
            item.assign_id(id.clone());
            assigned += 1;
        }
    }

    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Item {
        id: Option<String>,
    }

    impl AssignId for Item {
        fn assign_id(&mut self, id: String) {
            self.id = Some(id);
        }
    }

    fn batch(n: usize) -> Vec<Item> {
        vec![Item::default(); n]
    }

    fn ids(items: &[Item]) -> Vec<Option<&str>> {
        items.iter().map(|i| i.id.as_deref()).collect()
    }

    fn response(errors: &[usize], unmodified: &[usize], persisted: &[&str]) -> BulkResponse {
        BulkResponse {
            error_count: errors.len() as u64,
            error_indices: errors.to_vec(),
            unmodified_indices: unmodified.to_vec(),
            persisted_recipients: persisted.iter().map(|s| (*s).to_string()).collect(),
            ..BulkResponse::default()
        }
    }

    #[test]
    fn test_skips_error_and_unmodified_positions() {
        let mut items = batch(4);
        let resp = response(&[1], &[3], &["id-A", "id-C"]);

        let assigned = attach_ids(&mut items, Some(&resp)).unwrap();

        assert_eq!(assigned, 2);
        assert_eq!(ids(&items), vec![Some("id-A"), None, Some("id-C"), None]);
    }

    #[test]
    fn test_single_item() {
        let mut items = batch(1);
        let resp = response(&[], &[], &["id-A"]);

        assert_eq!(attach_ids(&mut items, Some(&resp)).unwrap(), 1);
        assert_eq!(ids(&items), vec![Some("id-A")]);
    }

    #[test]
    fn test_absent_response_is_noop() {
        let mut items = batch(2);

        assert_eq!(attach_ids(&mut items, None).unwrap(), 0);
        assert_eq!(ids(&items), vec![None, None]);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut items: Vec<Item> = Vec::new();
        let resp = response(&[], &[], &[]);
        assert_eq!(attach_ids(&mut items, Some(&resp)).unwrap(), 0);
    }

    #[test]
    fn test_all_unmodified_assigns_nothing() {
        let mut items = batch(3);
        let resp = response(&[], &[0, 1, 2], &[]);

        assert_eq!(attach_ids(&mut items, Some(&resp)).unwrap(), 0);
        assert_eq!(ids(&items), vec![None, None, None]);
    }

    #[test]
    fn test_short_identifiers_fail_without_mutation() {
        let mut items = batch(3);
        let resp = response(&[1], &[], &["only-one"]);

        let result = attach_ids(&mut items, Some(&resp));

        assert_eq!(
            result,
            Err(ReconcileError::MissingIdentifiers {
                required: 2,
                available: 1
            })
        );
        assert_eq!(ids(&items), vec![None, None, None]);
    }

    #[test]
    fn test_overlapping_sets_skip_once() {
        let mut items = batch(3);
        let resp = response(&[1], &[1], &["id-0", "id-2"]);

        assert_eq!(attach_ids(&mut items, Some(&resp)).unwrap(), 2);
        assert_eq!(ids(&items), vec![Some("id-0"), None, Some("id-2")]);
    }

    #[test]
    fn test_surplus_identifiers_are_ignored() {
        let mut items = batch(1);
        let resp = response(&[], &[], &["id-0", "extra"]);

        assert_eq!(attach_ids(&mut items, Some(&resp)).unwrap(), 1);
        assert_eq!(ids(&items), vec![Some("id-0")]);
    }

    #[test]
    fn test_out_of_range_indices_do_not_skip() {
        let mut items = batch(2);
        let resp = response(&[7], &[], &["id-0", "id-1"]);

        assert_eq!(attach_ids(&mut items, Some(&resp)).unwrap(), 2);
        assert_eq!(ids(&items), vec![Some("id-0"), Some("id-1")]);
    }

    #[test]
    fn test_rerun_yields_same_ids() {
        let mut items = batch(4);
        let resp = response(&[0], &[2], &["b", "d"]);

        attach_ids(&mut items, Some(&resp)).unwrap();
        let first = items.clone();
        attach_ids(&mut items, Some(&resp)).unwrap();

        assert_eq!(items, first);
    }

    #[test]
    fn test_assigns_exactly_the_surviving_positions() {
        // Every subset placement over a batch of five, split between the sets.
        let n = 5;
        for mask in 0u32..(1 << n) {
            for split in 0u32..(1 << n) {
                let skipped: Vec<usize> = (0..n).filter(|p| mask & (1 << p) != 0).collect();
                let errors: Vec<usize> =
                    skipped.iter().copied().filter(|p| split & (1 << p) != 0).collect();
                let unmodified: Vec<usize> =
                    skipped.iter().copied().filter(|p| split & (1 << p) == 0).collect();
                let survivors: Vec<usize> = (0..n).filter(|p| mask & (1 << p) == 0).collect();
                let persisted: Vec<String> =
                    survivors.iter().map(|p| format!("id-{p}")).collect();

                let resp = BulkResponse {
                    error_indices: errors,
                    unmodified_indices: unmodified,
                    persisted_recipients: persisted,
                    ..BulkResponse::default()
                };
                let mut items = batch(n);

                let assigned = attach_ids(&mut items, Some(&resp)).unwrap();

                assert_eq!(assigned, survivors.len());
                for (position, item) in items.iter().enumerate() {
                    if survivors.contains(&position) {
                        assert_eq!(item.id, Some(format!("id-{position}")));
                    } else {
                        assert_eq!(item.id, None);
                    }
                }
            }
        }
    }

    #[test]
    fn test_bulk_response_deserializes_with_missing_fields() {
        let resp: BulkResponse = serde_json::from_str(
            r#"{"new_count": 1, "persisted_recipients": ["YUBh"], "error_count": 0}"#,
        )
        .unwrap();

        assert_eq!(resp.new_count, 1);
        assert!(resp.error_indices.is_empty());
        assert!(resp.is_complete_success());
    }

    #[test]
    fn test_error_for_position() {
        let resp: BulkResponse = serde_json::from_str(
            r#"{
                "error_count": 1,
                "error_indices": [2],
                "errors": [{"message": "Invalid email.", "error_indices": [2]}]
            }"#,
        )
        .unwrap();

        assert!(!resp.is_complete_success());
        assert_eq!(resp.error_for(2), Some("Invalid email."));
        assert_eq!(resp.error_for(0), None);
    }
}
