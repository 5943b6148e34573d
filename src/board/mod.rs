//! Board engine: the stateful facade the kanban surface drives.
//!
//! DESIGN
//! ======
//! The host UI forwards raw interaction events (card clicks, pointer events
//! on the background, completed drags) and renders from the engine's view
//! state. Everything that must be observable by the host but happens
//! asynchronously — refresh demands after a persisted move, user-facing
//! failure notices — flows out through a bounded event channel, mirroring
//! the one-way data flow of the rest of the app.
//!
//! The engine holds a flat snapshot of the channel's items purely to resolve
//! column order for shift-click ranges; it is not a cache the reorder paths
//! trust. Every drag resolution re-fetches through the store.

pub mod rect;
pub mod reorder;
pub mod selection;


use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::consts::EVENT_CHANNEL_CAPACITY;
use crate::item::{ContentItem, ItemId, sort_column};
use crate::store::{ItemStore, PartitionFilter, StoreError};

use rect::{BoundingBox, OverlayStyle, Point, RectTracker};
use reorder::{DragResult, ReorderError, move_across_columns, multi_move, reorder_within_column};
use selection::{Modifiers, SelectTarget, SelectionState};

// =============================================================================
// EVENTS
// =============================================================================

/// Out-of-band signals for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The named columns changed on the backend and must be refetched.
    /// An empty list means "refetch everything" — issued after a failed
    /// drag, when the set of columns actually touched is unknown.
    Refresh { columns: Vec<String> },
    /// A user-facing failure notice.
    Notice { message: String },
}

// =============================================================================
// ENGINE
// =============================================================================

/// Interaction state for one rendered board (one channel, one epic-visibility
/// setting).
pub struct BoardEngine {
    store: Arc<dyn ItemStore>,
    channel_id: Uuid,
    show_epics: bool,
    items: Vec<ContentItem>,
    selection: SelectionState,
    tracker: RectTracker,
    events: mpsc::Sender<BoardEvent>,
}

impl BoardEngine {
    /// Build an engine and the receiving end of its event channel.
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>, channel_id: Uuid, show_epics: bool) -> (Self, mpsc::Receiver<BoardEvent>) {
        let (events, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let engine = Self {
            store,
            channel_id,
            show_epics,
            items: Vec::new(),
            selection: SelectionState::new(),
            tracker: RectTracker::new(),
            events,
        };
        (engine, rx)
    }

    // ===== VIEW ===============================================================

    /// Refetch the channel's items and replace the view snapshot.
    ///
    /// # Errors
    ///
    /// Store errors pass through; the previous snapshot is kept on failure.
    pub async fn load_view(&mut self) -> Result<(), StoreError> {
        let mut filter = PartitionFilter::channel(self.channel_id);
        if !self.show_epics {
            filter = filter.epics(false);
        }
        let items = self.store.fetch_by_partition(&filter).await?;
        self.replace_view(items);
        Ok(())
    }

    /// Replace the view snapshot with externally fetched items. Selection is
    /// dropped wholesale: remembered ids may no longer exist or may have
    /// moved columns.
    pub fn replace_view(&mut self, items: Vec<ContentItem>) {
        self.items = items;
        self.selection.clear();
    }

    /// Current snapshot, unordered.
    #[must_use]
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Display order of one column within the snapshot.
    #[must_use]
    pub fn column_order(&self, status: &str) -> Vec<ItemId> {
        let mut column: Vec<ContentItem> = self.items.iter().filter(|it| it.status == status).cloned().collect();
        sort_column(&mut column);
        column.into_iter().map(|it| it.id).collect()
    }

    // ===== SELECTION ==========================================================

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Handle a card click. `raw` is the card callback payload: one id, or a
    /// comma-joined batch. Unparseable payloads are dropped with a warning.
    pub fn on_card_select(&mut self, raw: &str, modifiers: Modifiers) {
        let Some(target) = SelectTarget::parse(raw) else {
            warn!(raw, "unparseable selection payload");
            return;
        };
        let column_order = match &target {
            SelectTarget::Single(id) => {
                let status = self.items.iter().find(|it| it.id == *id).map(|it| it.status.clone());
                status.map(|s| self.column_order(&s)).unwrap_or_default()
            }
            SelectTarget::Batch(_) => Vec::new(),
        };
        self.selection.select(&target, modifiers, &column_order, Instant::now());
    }

    // ===== RECTANGLE GESTURE ==================================================

    /// Record a card's rendered bounding box for rectangle hit-testing.
    pub fn register_item_position(&mut self, id: ItemId, bbox: BoundingBox) {
        self.tracker.register(id, bbox);
    }

    /// Pointer pressed on the board surface. Returns whether a rectangle
    /// gesture started.
    pub fn pointer_down(&mut self, point: Point, on_interactive: bool) -> bool {
        self.tracker.pointer_down(point, on_interactive)
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.tracker.pointer_move(point);
    }

    /// Pointer released: completes any rectangle gesture and merges the hits
    /// into the selection. Always additive — a one-card rectangle must not
    /// toggle that card back off.
    pub fn pointer_up(&mut self) {
        let hits = self.tracker.pointer_up();
        self.selection.select_batch(&hits, true, Instant::now());
    }

    /// Pointer left the board surface; same resolution as a release.
    pub fn pointer_leave(&mut self) {
        let hits = self.tracker.pointer_leave();
        self.selection.select_batch(&hits, true, Instant::now());
    }

    #[must_use]
    pub fn overlay(&self) -> OverlayStyle {
        self.tracker.overlay()
    }

    // ===== DRAG RESOLUTION ====================================================

    /// Resolve a completed drag gesture against the store.
    ///
    /// A missing destination is a cancelled gesture: nothing happens, not
    /// even a refresh. On success a `Refresh` names the columns that
    /// changed; on failure the user gets a notice and an unconditional full
    /// refresh, which reconciles the view with whatever partially persisted.
    pub async fn on_drag_end(&mut self, result: DragResult) {
        let Some(dest) = result.destination else {
            return;
        };

        let dragged = result.dragged_id;
        let multi = self.selection.is_selected(dragged) && self.selection.len() > 1;

        let outcome = if multi {
            let selected = self.selection.selected().to_vec();
            multi_move(&*self.store, self.channel_id, self.show_epics, &selected, dragged, &dest).await
        } else if result.source.status == dest.status {
            reorder_within_column(&*self.store, self.channel_id, self.show_epics, &dest.status, dragged, dest.index)
                .await
        } else {
            move_across_columns(&*self.store, self.channel_id, self.show_epics, dragged, &dest).await
        };

        match outcome {
            Ok(columns) => self.emit(BoardEvent::Refresh { columns }),
            Err(err) => {
                error!(%dragged, error = %err, "drag resolution failed");
                let message = match err {
                    ReorderError::NotFound(_) => "That card no longer exists. Refreshing the board.".to_owned(),
                    ReorderError::Store(_) => "Could not save the new card order. Refreshing the board.".to_owned(),
                };
                self.emit(BoardEvent::Notice { message });
                self.emit(BoardEvent::Refresh { columns: Vec::new() });
            }
        }
    }

    // ===== PLUMBING ===========================================================

    /// Best-effort event delivery: a full channel drops the event rather
    /// than blocking interaction handling.
    fn emit(&self, event: BoardEvent) {
        if let Err(err) = self.events.try_send(event) {
            warn!(error = %err, "board event channel full; dropping event");
        }
    }
}
