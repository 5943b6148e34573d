//! In-memory item store.
//!
//! Backs tests and local runs. Items live in a `HashMap` behind a tokio
//! `RwLock`; semantics mirror the Postgres backend, including the
//! sequential, non-transactional batch index rewrite.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::item::{ContentItem, ItemId, NewContentItem, PartialContentItem};
use crate::store::{IndexUpdate, ItemStore, PartitionFilter, StoreError};

/// In-memory implementation of [`ItemStore`].
#[derive(Clone, Default)]
pub struct MemoryItemStore {
    items: Arc<RwLock<HashMap<ItemId, ContentItem>>>,
}

impl MemoryItemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item verbatim, bypassing index assignment. Test seeding.
    pub async fn insert_raw(&self, item: ContentItem) {
        self.items.write().await.insert(item.id, item);
    }

    fn matches(filter: &PartitionFilter, item: &ContentItem) -> bool {
        item.channel_id == filter.channel_id
            && filter.status.as_deref().is_none_or(|s| item.status == s)
            && filter.is_epic.is_none_or(|e| item.is_epic == e)
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn fetch_by_id(&self, id: ItemId) -> Result<Option<ContentItem>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn fetch_by_partition(&self, filter: &PartitionFilter) -> Result<Vec<ContentItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items.values().filter(|it| Self::matches(filter, it)).cloned().collect())
    }

    async fn create(&self, new_item: NewContentItem) -> Result<ContentItem, StoreError> {
        let mut items = self.items.write().await;
        // Next index spans the whole (channel, status) partition: epics and
        // regular items share one index space.
        let next_index = items
            .values()
            .filter(|it| it.channel_id == new_item.channel_id && it.status == new_item.status)
            .map(|it| it.index)
            .max()
            .unwrap_or(-1)
            + 1;

        let item = ContentItem {
            id: Uuid::new_v4(),
            channel_id: new_item.channel_id,
            title: new_item.title,
            status: new_item.status,
            index: next_index,
            is_epic: new_item.is_epic,
            tags: new_item.tags,
            due_date: new_item.due_date,
        };
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: ItemId, fields: &PartialContentItem) -> Result<ContentItem, StoreError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.apply_partial(fields);
        Ok(item.clone())
    }

    async fn batch_update_indices(&self, updates: &[IndexUpdate]) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        for update in updates {
            let item = items.get_mut(&update.id).ok_or(StoreError::NotFound(update.id))?;
            item.index = update.index;
        }
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(&id).is_some())
    }
}
