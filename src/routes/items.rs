//! Content item routes.

#[cfg(test)]
#[path = "items_test.rs"]
mod items_test;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::item::{ContentItem, NewContentItem, PartialContentItem, sort_column};
use crate::state::AppState;
use crate::store::{IndexUpdate, PartitionFilter, StoreError};

#[derive(Deserialize)]
pub struct ListItemsQuery {
    /// Narrow to one status column.
    pub status: Option<String>,
    /// `true` for epics only, `false` for regular items only, absent for
    /// the merged set.
    pub epics: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateItemBody {
    pub title: String,
    pub status: String,
    #[serde(default)]
    pub is_epic: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due_date: Option<Date>,
}

#[derive(Deserialize)]
pub struct ReindexBody {
    pub updates: Vec<IndexUpdate>,
}

/// `GET /api/channels/:channel_id/items` — list a channel's items in
/// display order.
pub async fn list_items(
    State(state): State<AppState>,
    Path(channel_id): Path<Uuid>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<ContentItem>>, StatusCode> {
    let mut filter = PartitionFilter::channel(channel_id);
    if let Some(status) = query.status {
        filter = filter.status(&status);
    }
    if let Some(epics) = query.epics {
        filter = filter.epics(epics);
    }

    let mut items = state.store.fetch_by_partition(&filter).await.map_err(store_error_to_status)?;
    sort_column(&mut items);
    Ok(Json(items))
}

/// `POST /api/channels/:channel_id/items` — create an item at the end of
/// its `(channel, status)` partition.
pub async fn create_item(
    State(state): State<AppState>,
    Path(channel_id): Path<Uuid>,
    Json(body): Json<CreateItemBody>,
) -> Result<(StatusCode, Json<ContentItem>), StatusCode> {
    let item = state
        .store
        .create(NewContentItem {
            channel_id,
            title: body.title,
            status: body.status,
            is_epic: body.is_epic,
            tags: body.tags,
            due_date: body.due_date,
        })
        .await
        .map_err(store_error_to_status)?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /api/items/:id` — fetch one item.
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContentItem>, StatusCode> {
    let item = state
        .store
        .fetch_by_id(id)
        .await
        .map_err(store_error_to_status)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(item))
}

/// `PATCH /api/items/:id` — apply a sparse update.
pub async fn patch_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PartialContentItem>,
) -> Result<Json<ContentItem>, StatusCode> {
    let item = state.store.update(id, &body).await.map_err(store_error_to_status)?;
    Ok(Json(item))
}

/// `DELETE /api/items/:id` — delete an item.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let removed = state.store.delete(id).await.map_err(store_error_to_status)?;
    if !removed {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/items/reindex` — batched index rewrite, the persistence call
/// behind every drag gesture. Applied sequentially; on failure the client
/// must refetch.
pub async fn reindex(
    State(state): State<AppState>,
    Json(body): Json<ReindexBody>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    state.store.batch_update_indices(&body.updates).await.map_err(store_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true, "updated": body.updates.len() })))
}

pub(crate) fn store_error_to_status(err: StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
