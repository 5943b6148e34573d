//! Ordering and multi-selection core for the copydesk content-planning board.
//!
//! This crate owns the logic behind the kanban surface: a persisted,
//! contiguous per-column ordering of content items that survives
//! drag-and-drop (single card, same-column reorder, cross-column move, and
//! batched multi-card moves), plus the modifier-key and rectangle
//! multi-selection model that feeds those batch moves. The host UI layer is
//! responsible only for wiring pointer/drag events into the
//! [`board::BoardEngine`] and refetching columns when it receives a
//! [`board::BoardEvent::Refresh`].
//!
//! Persistence is consumed strictly through the [`store::ItemStore`]
//! contract; the engines never know whether an in-memory map or Postgres
//! backs them.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`item`] | Content item model and sparse updates |
//! | [`store`] | Item Store contract plus memory and Postgres backends |
//! | [`board`] | Board engine: selection, rectangle tracker, drag-reorder |
//! | [`consts`] | Shared constants (debounce window, channel capacity) |
//! | [`state`] | Shared state for the HTTP surface |
//! | [`db`] | Pool initialization and migrations |
//! | [`routes`] | REST surface over the item store |

pub mod board;
pub mod consts;
pub mod db;
pub mod item;
pub mod routes;
pub mod state;
pub mod store;
