//! Shared constants for the board engine.

use std::time::Duration;

// ── Selection ───────────────────────────────────────────────────

/// Window after a selection event in which repeated plain clicks on the same
/// already-selected card are treated as double-click noise rather than a
/// deselect.
pub const SELECT_DEBOUNCE: Duration = Duration::from_millis(1000);

// ── Events ──────────────────────────────────────────────────────

/// Bounded capacity of the board event channel. Delivery is best-effort;
/// a full channel drops the event rather than blocking a gesture.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
