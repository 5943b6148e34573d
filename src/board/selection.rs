//! Selection engine: modifier-key click semantics as a pure state machine.
//!
//! DESIGN
//! ======
//! The whole engine is a transition over `(selection, anchor, target,
//! modifiers, column order, now)` with no pointer or DOM types in sight, so
//! every click rule is unit-testable. Selection order is preserved in a
//! `Vec` because multi-card moves splice items into the destination column
//! in the order they were selected. The anchor is the reference point for
//! shift-click ranges; `now` is passed in rather than sampled so the
//! double-click debounce can be tested without sleeping.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::time::Instant;

use crate::consts::SELECT_DEBOUNCE;
use crate::item::ItemId;

/// Modifier keys held during a selection event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Ctrl (or Cmd on macOS) is held: toggle / additive semantics.
    pub ctrl_or_meta: bool,
    /// Shift is held: range selection from the anchor.
    pub shift: bool,
}

/// What a selection event points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    /// One card was clicked.
    Single(ItemId),
    /// A batch of ids, e.g. the result of a rectangle selection.
    Batch(Vec<ItemId>),
}

impl SelectTarget {
    /// Parse the wire form used by card callbacks: a single id or a
    /// comma-joined id list. Unparseable ids are dropped; an empty result
    /// is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.contains(',') {
            let ids: Vec<ItemId> = raw.split(',').filter_map(|part| part.trim().parse().ok()).collect();
            if ids.is_empty() { None } else { Some(Self::Batch(ids)) }
        } else {
            raw.trim().parse().ok().map(Self::Single)
        }
    }
}

/// The set of currently selected cards plus range-selection bookkeeping.
#[derive(Debug, Default)]
pub struct SelectionState {
    selected: Vec<ItemId>,
    anchor: Option<ItemId>,
    last_event: Option<Instant>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn selected(&self) -> &[ItemId] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The range-selection anchor: the most recently selected id.
    #[must_use]
    pub fn anchor(&self) -> Option<ItemId> {
        self.anchor
    }

    /// Drop all selection state. Called whenever the board view is replaced:
    /// a reloaded column invalidates every remembered id.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.last_event = None;
    }

    /// Apply one selection event.
    ///
    /// `column_order` is the ordered id list of the anchor's column (merged
    /// regular + epic, ascending index); it is only consulted for
    /// shift-click ranges. Unknown ids fail range resolution and the event
    /// becomes a no-op.
    pub fn select(&mut self, target: &SelectTarget, modifiers: Modifiers, column_order: &[ItemId], now: Instant) {
        match target {
            SelectTarget::Batch(ids) => self.select_batch(ids, modifiers.ctrl_or_meta, now),
            SelectTarget::Single(id) => {
                if modifiers.ctrl_or_meta {
                    self.toggle(*id, now);
                } else if modifiers.shift && self.anchor.is_some() {
                    self.extend_range(*id, column_order, now);
                } else {
                    self.replace_or_clear(*id, now);
                }
            }
        }
    }

    /// Batch form: union when additive, replace otherwise. The anchor
    /// becomes the last id of the batch. Empty batches are a no-op.
    pub fn select_batch(&mut self, ids: &[ItemId], additive: bool, now: Instant) {
        if ids.is_empty() {
            return;
        }
        if !additive {
            self.selected.clear();
        }
        for id in ids {
            if !self.selected.contains(id) {
                self.selected.push(*id);
            }
        }
        self.anchor = ids.last().copied();
        self.last_event = Some(now);
    }

    fn toggle(&mut self, id: ItemId, now: Instant) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        // The anchor moves to the clicked card whether or not it stayed
        // selected; a following shift-click ranges from here.
        self.anchor = Some(id);
        self.last_event = Some(now);
    }

    fn extend_range(&mut self, id: ItemId, column_order: &[ItemId], now: Instant) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let Some(anchor_pos) = column_order.iter().position(|c| *c == anchor) else {
            return;
        };
        let Some(target_pos) = column_order.iter().position(|c| *c == id) else {
            return;
        };

        let (lo, hi) = if anchor_pos <= target_pos { (anchor_pos, target_pos) } else { (target_pos, anchor_pos) };
        for range_id in &column_order[lo..=hi] {
            if !self.selected.contains(range_id) {
                self.selected.push(*range_id);
            }
        }
        self.last_event = Some(now);
    }

    fn replace_or_clear(&mut self, id: ItemId, now: Instant) {
        let is_lone_selection = self.anchor == Some(id) && self.selected == [id];
        if is_lone_selection {
            // EDGE: rapid re-clicks on the selected card are double-click
            // noise, not a deselect.
            let within_window = self.last_event.is_some_and(|t| now.duration_since(t) < SELECT_DEBOUNCE);
            if within_window {
                self.last_event = Some(now);
                return;
            }
            self.clear();
            return;
        }
        self.selected.clear();
        self.selected.push(id);
        self.anchor = Some(id);
        self.last_event = Some(now);
    }
}
