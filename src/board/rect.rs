//! Rectangle selection tracker: the free-form drag-to-select gesture.
//!
//! DESIGN
//! ======
//! A two-state machine (Idle → Selecting → Idle) driven by pointer events in
//! board-local coordinates. Cards register their bounding boxes as they
//! render; registration is last-write-wins and boxes are read only when the
//! gesture ends, so layout shifts during the drag cost nothing. A box that
//! moved between registration and release yields a stale intersection — an
//! accepted approximation, not an invariant violation.

#[cfg(test)]
#[path = "rect_test.rs"]
mod rect_test;

use std::collections::HashMap;

use crate::item::ItemId;

/// A point in board-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in board-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// The box spanned by two corner points, in either diagonal direction.
    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// AABB overlap test. Shared edges count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.right >= other.left && self.left <= other.right && self.bottom >= other.top && self.top <= other.bottom
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Style descriptor for the selection overlay rendered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub visible: bool,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayStyle {
    const HIDDEN: Self = Self { visible: false, left: 0.0, top: 0.0, width: 0.0, height: 0.0 };
}

/// Gesture state for the tracker.
#[derive(Debug, Clone, Copy, Default)]
enum TrackerState {
    #[default]
    Idle,
    Selecting { start: Point, end: Point },
}

/// Tracks a rectangular selection gesture over the board background and
/// intersects the final rectangle with registered card bounding boxes.
#[derive(Debug, Default)]
pub struct RectTracker {
    state: TrackerState,
    positions: HashMap<ItemId, BoundingBox>,
}

impl RectTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a card's current bounding box. Last write wins.
    pub fn register(&mut self, id: ItemId, bbox: BoundingBox) {
        self.positions.insert(id, bbox);
    }

    /// Whether a selection gesture is in progress.
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        matches!(self.state, TrackerState::Selecting { .. })
    }

    /// Pointer pressed on the board. `on_interactive` is true when the press
    /// originated on a card, droppable area, or button — those presses
    /// belong to other gestures and never start a rectangle. Returns whether
    /// a gesture started.
    pub fn pointer_down(&mut self, point: Point, on_interactive: bool) -> bool {
        if on_interactive || self.is_selecting() {
            return false;
        }
        self.state = TrackerState::Selecting { start: point, end: point };
        true
    }

    /// Pointer moved; updates the live rectangle while selecting.
    pub fn pointer_move(&mut self, point: Point) {
        if let TrackerState::Selecting { start, .. } = self.state {
            self.state = TrackerState::Selecting { start, end: point };
        }
    }

    /// Pointer released: ends the gesture and returns the ids whose
    /// registered boxes intersect the final rectangle, in reading order
    /// (top, then left) so the resulting batch anchor is deterministic.
    pub fn pointer_up(&mut self) -> Vec<ItemId> {
        let TrackerState::Selecting { start, end } = self.state else {
            return Vec::new();
        };
        self.state = TrackerState::Idle;

        let rect = BoundingBox::from_points(start, end);
        let mut hits: Vec<(ItemId, BoundingBox)> = self
            .positions
            .iter()
            .filter(|(_, bbox)| rect.intersects(bbox))
            .map(|(id, bbox)| (*id, *bbox))
            .collect();
        hits.sort_by(|a, b| a.1.top.total_cmp(&b.1.top).then(a.1.left.total_cmp(&b.1.left)));
        hits.into_iter().map(|(id, _)| id).collect()
    }

    /// Pointer left the board surface: treated exactly like a release so a
    /// gesture can never be left dangling.
    pub fn pointer_leave(&mut self) -> Vec<ItemId> {
        self.pointer_up()
    }

    /// Current overlay descriptor: the live rectangle while selecting,
    /// hidden and zero-sized while idle.
    #[must_use]
    pub fn overlay(&self) -> OverlayStyle {
        match self.state {
            TrackerState::Idle => OverlayStyle::HIDDEN,
            TrackerState::Selecting { start, end } => {
                let rect = BoundingBox::from_points(start, end);
                OverlayStyle {
                    visible: true,
                    left: rect.left,
                    top: rect.top,
                    width: rect.width(),
                    height: rect.height(),
                }
            }
        }
    }
}
