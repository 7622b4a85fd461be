//! Write acknowledgements returned to clients.
//!
//! Mutating endpoints report what the store did rather than echoing the
//! document: how many records matched and changed, which identifier was
//! assigned, or how many records were removed.

use serde::{Deserialize, Serialize};

/// Result of an update by key.
///
/// `matched_count` is zero when no record carried the key;
/// `modified_count` is zero when the record already held the new values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateOutcome {
    /// No record matched the key.
    pub const UNMATCHED: Self = Self {
        matched_count: 0,
        modified_count: 0,
    };

    /// One record matched; `modified` says whether its values changed.
    #[must_use]
    pub const fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: if modified { 1 } else { 0 },
        }
    }
}

/// Result of an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub inserted_id: String,
}

impl InsertOutcome {
    /// Acknowledge an insert under `id`.
    pub fn new(id: impl ToString) -> Self {
        Self {
            inserted_id: id.to_string(),
        }
    }
}

/// Result of a delete by key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}
