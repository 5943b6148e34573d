//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the item store behind the [`ItemStore`] trait object so the HTTP
//! surface is backend-agnostic: Postgres in deployment, the in-memory store
//! in handler tests.

use std::sync::Arc;

use crate::store::ItemStore;

/// Shared application state. Clone is required by Axum; the store is
/// Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
