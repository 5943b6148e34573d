//! Postgres item store.
//!
//! DESIGN
//! ======
//! Straightforward row-per-item mapping over the `content_items` table.
//! `create` computes the next partition index with a `MAX(..) + 1` in the
//! same statement. `batch_update_indices` issues sequential UPDATEs with no
//! surrounding transaction: the contract allows partial application and
//! obliges callers to resync on failure, so the cheap path is the honest
//! one.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};
use time::Date;
use uuid::Uuid;

use crate::item::{ContentItem, ItemId, NewContentItem, PartialContentItem};
use crate::store::{IndexUpdate, ItemStore, PartitionFilter, StoreError};

type ItemRow = (Uuid, Uuid, String, String, i32, bool, Vec<String>, Option<Date>);

const ITEM_COLUMNS: &str = r#"id, channel_id, title, status, "index", is_epic, tags, due_date"#;

fn row_to_item(row: ItemRow) -> ContentItem {
    let (id, channel_id, title, status, index, is_epic, tags, due_date) = row;
    ContentItem { id, channel_id, title, status, index, is_epic, tags, due_date }
}

/// Postgres implementation of [`ItemStore`].
#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn fetch_by_id(&self, id: ItemId) -> Result<Option<ContentItem>, StoreError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"SELECT id, channel_id, title, status, "index", is_epic, tags, due_date
               FROM content_items WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_item))
    }

    async fn fetch_by_partition(&self, filter: &PartitionFilter) -> Result<Vec<ContentItem>, StoreError> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {ITEM_COLUMNS} FROM content_items WHERE channel_id = "
        ));
        builder.push_bind(filter.channel_id);
        if let Some(ref status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }
        if let Some(is_epic) = filter.is_epic {
            builder.push(" AND is_epic = ");
            builder.push_bind(is_epic);
        }
        builder.push(r#" ORDER BY "index" ASC, id ASC"#);

        let rows = builder.build_query_as::<ItemRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn create(&self, new_item: NewContentItem) -> Result<ContentItem, StoreError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, ItemRow>(
            r#"INSERT INTO content_items (id, channel_id, title, status, "index", is_epic, tags, due_date)
               SELECT $1, $2, $3, $4, COALESCE(MAX("index"), -1) + 1, $5, $6, $7
               FROM content_items WHERE channel_id = $2 AND status = $4
               RETURNING id, channel_id, title, status, "index", is_epic, tags, due_date"#,
        )
        .bind(id)
        .bind(new_item.channel_id)
        .bind(&new_item.title)
        .bind(&new_item.status)
        .bind(new_item.is_epic)
        .bind(&new_item.tags)
        .bind(new_item.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_item(row))
    }

    async fn update(&self, id: ItemId, fields: &PartialContentItem) -> Result<ContentItem, StoreError> {
        // Read-modify-write; the sparse-update logic lives in one place.
        let mut item = self.fetch_by_id(id).await?.ok_or(StoreError::NotFound(id))?;
        item.apply_partial(fields);

        let result = sqlx::query(
            r#"UPDATE content_items
               SET title = $2, status = $3, "index" = $4, tags = $5, due_date = $6, updated_at = now()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(&item.title)
        .bind(&item.status)
        .bind(item.index)
        .bind(&item.tags)
        .bind(item.due_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(item)
    }

    async fn batch_update_indices(&self, updates: &[IndexUpdate]) -> Result<(), StoreError> {
        for update in updates {
            let result = sqlx::query(r#"UPDATE content_items SET "index" = $2, updated_at = now() WHERE id = $1"#)
                .bind(update.id)
                .bind(update.index)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(update.id));
            }
        }
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
