//! Item Store contract — the persistence seam the board engines depend on.
//!
//! DESIGN
//! ======
//! All mutation of content items goes through `ItemStore`. The trait is
//! object-safe so the engines take `Arc<dyn ItemStore>` and never learn
//! which backend is live: [`memory::MemoryItemStore`] in tests and local
//! runs, [`postgres::PgItemStore`] in deployment. `batch_update_indices`
//! is intentionally non-transactional: partial application is possible,
//! and callers must treat any failure as "resync required".

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::item::{ContentItem, ItemId, NewContentItem, PartialContentItem};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(ItemId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Filter for partition fetches. `channel_id` is mandatory; `status` and
/// `is_epic` narrow the result when present.
#[derive(Debug, Clone)]
pub struct PartitionFilter {
    pub channel_id: Uuid,
    pub status: Option<String>,
    pub is_epic: Option<bool>,
}

impl PartitionFilter {
    /// All items in a channel.
    #[must_use]
    pub fn channel(channel_id: Uuid) -> Self {
        Self { channel_id, status: None, is_epic: None }
    }

    /// Narrow to one status column.
    #[must_use]
    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_owned());
        self
    }

    /// Narrow to epics or regular items only.
    #[must_use]
    pub fn epics(mut self, is_epic: bool) -> Self {
        self.is_epic = Some(is_epic);
        self
    }
}

/// One entry of a batched index rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndexUpdate {
    pub id: ItemId,
    pub index: i32,
}

// =============================================================================
// CONTRACT
// =============================================================================

/// The persistence contract for content items.
///
/// Fetches return whatever order the backend produces; callers sort with
/// [`crate::item::sort_column`]. A missing id from `fetch_by_id` is a valid
/// (non-exceptional) outcome; from `update` it is an error.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetch one item by id. `Ok(None)` when absent.
    async fn fetch_by_id(&self, id: ItemId) -> Result<Option<ContentItem>, StoreError>;

    /// Fetch all items matching the partition filter. Empty when none match.
    async fn fetch_by_partition(&self, filter: &PartitionFilter) -> Result<Vec<ContentItem>, StoreError>;

    /// Create an item, assigning its id and the next index in the
    /// `(channel_id, status)` partition.
    async fn create(&self, new_item: NewContentItem) -> Result<ContentItem, StoreError>;

    /// Apply a sparse update, returning the updated item.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not exist.
    async fn update(&self, id: ItemId, fields: &PartialContentItem) -> Result<ContentItem, StoreError>;

    /// Rewrite indices for a batch of items. Applied sequentially; a failure
    /// part-way leaves earlier updates in place, so the caller must refetch
    /// on any error.
    async fn batch_update_indices(&self, updates: &[IndexUpdate]) -> Result<(), StoreError>;

    /// Delete an item. Returns whether anything was removed.
    async fn delete(&self, id: ItemId) -> Result<bool, StoreError>;
}
