//! Content item model: the card entity, creation payload, and sparse updates.
//!
//! An item lives in exactly one `(channel_id, status)` partition and carries
//! an `index` giving its position within that partition. The core invariant
//! of the whole crate is that after any successful mutation the indices in a
//! partition are exactly `0..n-1`. Epics share the same index space as
//! regular items; when a board shows epics, both flavors merge into one
//! ordered sequence.

#[cfg(test)]
#[path = "item_test.rs"]
mod item_test;

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;
use uuid::Uuid;

/// Unique identifier for a content item.
pub type ItemId = Uuid;

/// A content item as stored and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier for this item.
    pub id: ItemId,
    /// The channel (blog, video, social, ...) this item belongs to.
    pub channel_id: Uuid,
    /// Card title.
    pub title: String,
    /// Workflow column this item sits in (e.g. `"Backlog"`, `"Done"`).
    pub status: String,
    /// Zero-based position within the `(channel_id, status)` partition.
    pub index: i32,
    /// Whether this item is an epic. Epics are fetched independently but
    /// ordered in the same index space as regular items.
    pub is_epic: bool,
    /// Free-form editorial tags.
    pub tags: Vec<String>,
    /// Publication deadline, if any.
    pub due_date: Option<Date>,
}

/// Payload for creating a new item. The store assigns the id and computes
/// the next index in the target partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContentItem {
    pub channel_id: Uuid,
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub is_epic: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due_date: Option<Date>,
}

/// Sparse update for a content item. Only present fields are applied.
///
/// `due_date` is doubly optional so a patch can distinguish "leave
/// unchanged" (absent) from "clear the deadline" (explicit null).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialContentItem {
    /// New title, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New status (column), if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// New index within the partition, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    /// Replacement tag list, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New due date (`Some(None)` clears it), if being updated.
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<Date>>,
}

/// Keep "field present but null" distinguishable from "field absent": a
/// present null must land as `Some(None)`, which a plain `Option<Option<_>>`
/// does not do.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Date>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Date>::deserialize(deserializer).map(Some)
}

impl PartialContentItem {
    /// A partial update that only changes the status. The most common patch
    /// the reorder engine issues.
    #[must_use]
    pub fn status_change(status: &str) -> Self {
        Self { status: Some(status.to_owned()), ..Self::default() }
    }
}

impl ContentItem {
    /// Apply a sparse update in place.
    pub fn apply_partial(&mut self, partial: &PartialContentItem) {
        if let Some(ref title) = partial.title {
            self.title = title.clone();
        }
        if let Some(ref status) = partial.status {
            self.status = status.clone();
        }
        if let Some(index) = partial.index {
            self.index = index;
        }
        if let Some(ref tags) = partial.tags {
            self.tags = tags.clone();
        }
        if let Some(due_date) = partial.due_date {
            self.due_date = due_date;
        }
    }
}

/// Sort a column slice into display order: ascending index, id as the
/// deterministic tie-break for data that predates the contiguity invariant.
pub fn sort_column(items: &mut [ContentItem]) {
    items.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.id.cmp(&b.id)));
}
