//! SendGrid contact database resources.
//!
//! # Overview
//!
//! - [`ContactsClient`]: entry point; hands out per-resource clients
//! - [`RecipientsClient`]: bulk add/update with id reconciliation, search
//!   and counts
//! - [`ListsClient`]: lists and list membership
//! - [`SegmentsClient`]: saved recipient queries
//! - [`CustomFieldsClient`]: custom and reserved fields
//! - [`attach_ids`]: maps the ids of a [`BulkResponse`] back onto a batch
//!
//! Every operation is a single round trip. Paginated calls return one page
//! and leave iteration to the caller.

mod client;
mod custom_fields;
mod errors;
mod lists;
mod recipients;
mod reconcile;
mod segments;

pub use client::ContactsClient;
pub use custom_fields::{CustomField, CustomFieldType, CustomFieldValue, CustomFieldsClient};
pub use errors::ContactsError;
pub use lists::{List, ListsClient};
pub use recipients::{Recipient, RecipientsClient, SearchTerm};
pub use reconcile::{attach_ids, AssignId, BulkError, BulkResponse, ReconcileError};
pub use segments::{AndOr, Condition, Operator, Segment, SegmentsClient};

/// Query parameters for one page of a paginated listing.
pub(crate) fn paging(page_size: u32, page: u32) -> Vec<(String, String)> {
    vec![
        ("page_size".to_string(), page_size.to_string()),
        ("page".to_string(), page.to_string()),
    ]
}
