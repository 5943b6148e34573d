//! Drag-reorder engine: one completed drag gesture in, ordered persistence
//! calls out.
//!
//! DESIGN
//! ======
//! Each resolution path rebuilds the affected column order in memory,
//! recomputes strictly sequential `0..n-1` indices, and persists them in a
//! single batch call *before* any status change. That ordering bounds the
//! inconsistency window: if the index batch fails part-way, no item has
//! changed column yet; once the batch has landed, the status writes drop
//! each item into the right column at an already-correct position.
//!
//! ERROR HANDLING
//! ==============
//! There is no multi-step transaction and no rollback. Every path is
//! best-effort; the caller ([`crate::board::BoardEngine`]) converts failures
//! into a user notice plus a full refetch, which reconciles the view with
//! whatever actually persisted.

#[cfg(test)]
#[path = "reorder_test.rs"]
mod reorder_test;

use std::collections::{BTreeSet, HashSet};

use tracing::warn;
use uuid::Uuid;

use crate::item::{ContentItem, ItemId, PartialContentItem, sort_column};
use crate::store::{IndexUpdate, ItemStore, PartitionFilter, StoreError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    #[error("item not found: {0}")]
    NotFound(ItemId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One endpoint of a drag gesture: a column and a position within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragLocation {
    pub status: String,
    pub index: usize,
}

impl DragLocation {
    #[must_use]
    pub fn new(status: &str, index: usize) -> Self {
        Self { status: status.to_owned(), index }
    }
}

/// The outcome descriptor of one drag gesture. A missing destination means
/// the card was dropped outside any valid column: a cancelled gesture.
#[derive(Debug, Clone)]
pub struct DragResult {
    pub dragged_id: ItemId,
    pub source: DragLocation,
    pub destination: Option<DragLocation>,
}

// =============================================================================
// COLUMN HELPERS
// =============================================================================

/// Fetch a column in display order: the merged regular+epic sequence when
/// epics are shown, regular items only otherwise.
async fn fetch_column(
    store: &dyn ItemStore,
    channel_id: Uuid,
    show_epics: bool,
    status: &str,
) -> Result<Vec<ContentItem>, StoreError> {
    let mut filter = PartitionFilter::channel(channel_id).status(status);
    if !show_epics {
        filter = filter.epics(false);
    }
    let mut items = store.fetch_by_partition(&filter).await?;
    sort_column(&mut items);
    Ok(items)
}

/// Index updates for every item whose stored index differs from its final
/// array position. Positions are strictly sequential `0..n-1`.
fn changed_indices(column: &[ContentItem]) -> Vec<IndexUpdate> {
    let mut updates = Vec::new();
    for (position, item) in column.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let index = position as i32;
        if item.index != index {
            updates.push(IndexUpdate { id: item.id, index });
        }
    }
    updates
}

// =============================================================================
// SAME-COLUMN REORDER
// =============================================================================

/// Move one card to a new position within its column. Persists a single
/// batch index rewrite; no status change is involved.
///
/// Returns the statuses whose columns changed (here: just the one).
///
/// # Errors
///
/// `NotFound` if the dragged card is no longer in the column; store errors
/// pass through.
pub async fn reorder_within_column(
    store: &dyn ItemStore,
    channel_id: Uuid,
    show_epics: bool,
    status: &str,
    dragged_id: ItemId,
    dest_index: usize,
) -> Result<Vec<String>, ReorderError> {
    let mut column = fetch_column(store, channel_id, show_epics, status).await?;
    let position = column
        .iter()
        .position(|it| it.id == dragged_id)
        .ok_or(ReorderError::NotFound(dragged_id))?;

    let item = column.remove(position);
    let at = dest_index.min(column.len());
    column.insert(at, item);

    store.batch_update_indices(&changed_indices(&column)).await?;
    Ok(vec![status.to_owned()])
}

// =============================================================================
// CROSS-COLUMN MOVE
// =============================================================================

/// Move one card into a different column at a given position.
///
/// The card is re-fetched by id first so the move acts on fresh data rather
/// than a stale rendered copy. Destination and source columns are both
/// re-indexed in one batch, then the status change is persisted.
///
/// # Errors
///
/// `NotFound` if the card was deleted concurrently; store errors pass
/// through.
pub async fn move_across_columns(
    store: &dyn ItemStore,
    channel_id: Uuid,
    show_epics: bool,
    dragged_id: ItemId,
    dest: &DragLocation,
) -> Result<Vec<String>, ReorderError> {
    let moved = store
        .fetch_by_id(dragged_id)
        .await?
        .ok_or(ReorderError::NotFound(dragged_id))?;
    let source_status = moved.status.clone();

    // EDGE: a concurrent move may have already landed the card in the
    // destination; degrade to a plain reorder instead of fetching the same
    // column twice.
    if source_status == dest.status {
        return reorder_within_column(store, channel_id, show_epics, &dest.status, dragged_id, dest.index).await;
    }

    let mut dest_column = fetch_column(store, channel_id, show_epics, &dest.status).await?;
    dest_column.retain(|it| it.id != dragged_id);
    let at = dest.index.min(dest_column.len());
    let mut placed = moved;
    placed.status = dest.status.clone();
    dest_column.insert(at, placed);

    let mut updates = changed_indices(&dest_column);

    let mut source_column = fetch_column(store, channel_id, show_epics, &source_status).await?;
    source_column.retain(|it| it.id != dragged_id);
    updates.extend(changed_indices(&source_column));

    // Indices first, status second: see the module design note.
    store.batch_update_indices(&updates).await?;
    store.update(dragged_id, &PartialContentItem::status_change(&dest.status)).await?;

    Ok(vec![source_status, dest.status.clone()])
}

// =============================================================================
// MULTI-MOVE
// =============================================================================

/// Move the whole selection to the destination column, preserving selection
/// order: the selected cards occupy consecutive positions starting at the
/// drop index.
///
/// Every selected card is re-fetched defensively. A vanished dragged card
/// aborts; other vanished cards are dropped from the move — the mandatory
/// refresh reconciles either way.
///
/// # Errors
///
/// `NotFound` if the dragged card was deleted concurrently; store errors
/// pass through.
pub async fn multi_move(
    store: &dyn ItemStore,
    channel_id: Uuid,
    show_epics: bool,
    selected: &[ItemId],
    dragged_id: ItemId,
    dest: &DragLocation,
) -> Result<Vec<String>, ReorderError> {
    let mut moved = Vec::with_capacity(selected.len());
    for id in selected {
        match store.fetch_by_id(*id).await? {
            Some(item) => moved.push(item),
            None if *id == dragged_id => return Err(ReorderError::NotFound(dragged_id)),
            None => warn!(%id, "selected item vanished during multi-move; skipping"),
        }
    }
    if moved.is_empty() {
        return Ok(Vec::new());
    }

    let moved_ids: HashSet<ItemId> = moved.iter().map(|it| it.id).collect();

    let mut dest_column = fetch_column(store, channel_id, show_epics, &dest.status).await?;
    dest_column.retain(|it| !moved_ids.contains(&it.id));
    let at = dest.index.min(dest_column.len());
    for (offset, item) in moved.iter().enumerate() {
        let mut placed = item.clone();
        placed.status = dest.status.clone();
        dest_column.insert(at + offset, placed);
    }

    let mut updates = changed_indices(&dest_column);

    // Re-index the remainder of every column the selection came from.
    let source_statuses: BTreeSet<String> = moved
        .iter()
        .map(|it| it.status.clone())
        .filter(|status| *status != dest.status)
        .collect();
    for status in &source_statuses {
        let mut column = fetch_column(store, channel_id, show_epics, status).await?;
        column.retain(|it| !moved_ids.contains(&it.id));
        updates.extend(changed_indices(&column));
    }

    // One index batch, then one status write per moved card.
    store.batch_update_indices(&updates).await?;
    for item in &moved {
        store.update(item.id, &PartialContentItem::status_change(&dest.status)).await?;
    }

    let mut affected: Vec<String> = source_statuses.into_iter().collect();
    affected.push(dest.status.clone());
    Ok(affected)
}
