//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the REST surface over the item store under a single Axum router.
//! The board UI (a separate frontend) talks to these endpoints for CRUD and
//! uses `/api/items/reindex` for the batched index rewrites the drag-reorder
//! engine produces.

pub mod items;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/channels/{channel_id}/items",
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/api/items/{id}",
            get(items::get_item).patch(items::patch_item).delete(items::delete_item),
        )
        .route("/api/items/reindex", post(items::reindex))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
