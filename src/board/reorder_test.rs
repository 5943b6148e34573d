use uuid::Uuid;

use super::*;
use crate::item::NewContentItem;
use crate::store::memory::MemoryItemStore;

async fn seed(store: &MemoryItemStore, channel_id: Uuid, status: &str, titles: &[&str]) -> Vec<ContentItem> {
    let mut items = Vec::new();
    for title in titles {
        let item = store
            .create(NewContentItem {
                channel_id,
                title: (*title).to_owned(),
                status: status.to_owned(),
                is_epic: false,
                tags: vec![],
                due_date: None,
            })
            .await
            .unwrap();
        items.push(item);
    }
    items
}

async fn seed_epic(store: &MemoryItemStore, channel_id: Uuid, status: &str, title: &str) -> ContentItem {
    store
        .create(NewContentItem {
            channel_id,
            title: title.to_owned(),
            status: status.to_owned(),
            is_epic: true,
            tags: vec![],
            due_date: None,
        })
        .await
        .unwrap()
}

/// Fetch a column in display order, epics included.
async fn column(store: &MemoryItemStore, channel_id: Uuid, status: &str) -> Vec<ContentItem> {
    let mut items = store
        .fetch_by_partition(&crate::store::PartitionFilter::channel(channel_id).status(status))
        .await
        .unwrap();
    sort_column(&mut items);
    items
}

fn titles(items: &[ContentItem]) -> Vec<&str> {
    items.iter().map(|it| it.title.as_str()).collect()
}

/// The core invariant: indices are exactly 0..n-1.
fn assert_contiguous(items: &[ContentItem]) {
    let indices: Vec<i32> = items.iter().map(|it| it.index).collect();
    let expected: Vec<i32> = (0..items.len()).map(|i| i32::try_from(i).unwrap()).collect();
    assert_eq!(indices, expected, "column indices must be contiguous from zero");
}

// =============================================================
// Same-column reorder
// =============================================================

#[tokio::test]
async fn drag_last_card_to_front() {
    // Backlog [A, B, C]; drag C to index 0 => [C, A, B].
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let cards = seed(&store, channel, "Backlog", &["A", "B", "C"]).await;

    let affected = reorder_within_column(&store, channel, false, "Backlog", cards[2].id, 0)
        .await
        .unwrap();
    assert_eq!(affected, vec!["Backlog"]);

    let backlog = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&backlog), vec!["C", "A", "B"]);
    assert_contiguous(&backlog);
}

#[tokio::test]
async fn reorder_preserves_relative_order_of_untouched_cards() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let cards = seed(&store, channel, "Backlog", &["a0", "a1", "a2", "a3", "a4"]).await;

    reorder_within_column(&store, channel, false, "Backlog", cards[1].id, 3)
        .await
        .unwrap();

    let backlog = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&backlog), vec!["a0", "a2", "a3", "a1", "a4"]);
    assert_contiguous(&backlog);
}

#[tokio::test]
async fn reorder_clamps_destination_past_the_end() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let cards = seed(&store, channel, "Backlog", &["A", "B", "C"]).await;

    reorder_within_column(&store, channel, false, "Backlog", cards[0].id, 99)
        .await
        .unwrap();

    let backlog = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&backlog), vec!["B", "C", "A"]);
    assert_contiguous(&backlog);
}

#[tokio::test]
async fn reorder_missing_card_is_not_found() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    seed(&store, channel, "Backlog", &["A"]).await;

    let result = reorder_within_column(&store, channel, false, "Backlog", Uuid::new_v4(), 0).await;
    assert!(matches!(result.unwrap_err(), ReorderError::NotFound(_)));
}

#[tokio::test]
async fn reorder_crosses_an_epic_in_the_merged_sequence() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    seed(&store, channel, "Backlog", &["A"]).await;
    seed_epic(&store, channel, "Backlog", "Epic").await;
    let b = seed(&store, channel, "Backlog", &["B"]).await.remove(0);

    // Epics shown: B jumps over the epic to the front of the merged column.
    reorder_within_column(&store, channel, true, "Backlog", b.id, 0)
        .await
        .unwrap();

    let backlog = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&backlog), vec!["B", "A", "Epic"]);
    assert_contiguous(&backlog);
}

// =============================================================
// Cross-column move
// =============================================================

#[tokio::test]
async fn move_into_empty_column() {
    // Writing empty, Review [X, Y]; drag X to Writing@0.
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let review = seed(&store, channel, "Review", &["X", "Y"]).await;

    let affected = move_across_columns(&store, channel, false, review[0].id, &DragLocation::new("Writing", 0))
        .await
        .unwrap();
    assert_eq!(affected, vec!["Review", "Writing"]);

    let writing = column(&store, channel, "Writing").await;
    assert_eq!(titles(&writing), vec!["X"]);
    assert_eq!(writing[0].status, "Writing");
    assert_contiguous(&writing);

    let review = column(&store, channel, "Review").await;
    assert_eq!(titles(&review), vec!["Y"]);
    assert_contiguous(&review);
}

#[tokio::test]
async fn move_reindexes_both_columns() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B", "C"]).await;
    seed(&store, channel, "Review", &["X", "Y"]).await;

    // Drag B into the middle of Review.
    move_across_columns(&store, channel, false, backlog[1].id, &DragLocation::new("Review", 1))
        .await
        .unwrap();

    let backlog = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&backlog), vec!["A", "C"]);
    assert_contiguous(&backlog);

    let review = column(&store, channel, "Review").await;
    assert_eq!(titles(&review), vec!["X", "B", "Y"]);
    assert_contiguous(&review);
    assert!(review.iter().all(|it| it.status == "Review"));
}

#[tokio::test]
async fn move_to_same_column_degrades_to_reorder() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let cards = seed(&store, channel, "Backlog", &["A", "B", "C"]).await;

    let affected = move_across_columns(&store, channel, false, cards[2].id, &DragLocation::new("Backlog", 0))
        .await
        .unwrap();
    assert_eq!(affected, vec!["Backlog"]);

    let backlog = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&backlog), vec!["C", "A", "B"]);
    assert_contiguous(&backlog);
}

#[tokio::test]
async fn move_of_deleted_card_is_not_found() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let cards = seed(&store, channel, "Backlog", &["A"]).await;
    store.delete(cards[0].id).await.unwrap();

    let result = move_across_columns(&store, channel, false, cards[0].id, &DragLocation::new("Review", 0)).await;
    assert!(matches!(result.unwrap_err(), ReorderError::NotFound(_)));
}

// =============================================================
// Multi-move
// =============================================================

#[tokio::test]
async fn multi_move_places_selection_contiguously() {
    // Select {A, C} in Backlog, drag A onto Done@0 where Done = [D]
    // => Done = [A, C, D], both moved cards now Done.
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B", "C"]).await;
    seed(&store, channel, "Done", &["D"]).await;

    let selection = vec![backlog[0].id, backlog[2].id];
    let affected = multi_move(&store, channel, false, &selection, backlog[0].id, &DragLocation::new("Done", 0))
        .await
        .unwrap();
    assert_eq!(affected, vec!["Backlog", "Done"]);

    let done = column(&store, channel, "Done").await;
    assert_eq!(titles(&done), vec!["A", "C", "D"]);
    assert_contiguous(&done);
    assert!(done.iter().all(|it| it.status == "Done"));

    let backlog = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&backlog), vec!["B"]);
    assert_contiguous(&backlog);
}

#[tokio::test]
async fn multi_move_respects_selection_order_not_column_order() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B", "C"]).await;

    // C was ctrl-clicked before A.
    let selection = vec![backlog[2].id, backlog[0].id];
    multi_move(&store, channel, false, &selection, backlog[2].id, &DragLocation::new("Done", 0))
        .await
        .unwrap();

    let done = column(&store, channel, "Done").await;
    assert_eq!(titles(&done), vec!["C", "A"]);
    assert_contiguous(&done);
}

#[tokio::test]
async fn multi_move_inserts_mid_column() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B"]).await;
    seed(&store, channel, "Done", &["D", "E", "F"]).await;

    let selection = vec![backlog[0].id, backlog[1].id];
    multi_move(&store, channel, false, &selection, backlog[0].id, &DragLocation::new("Done", 1))
        .await
        .unwrap();

    let done = column(&store, channel, "Done").await;
    assert_eq!(titles(&done), vec!["D", "A", "B", "E", "F"]);
    assert_contiguous(&done);
}

#[tokio::test]
async fn multi_move_gathers_from_multiple_source_columns() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B"]).await;
    let review = seed(&store, channel, "Review", &["X", "Y"]).await;

    let selection = vec![backlog[0].id, review[1].id];
    let affected = multi_move(&store, channel, false, &selection, backlog[0].id, &DragLocation::new("Done", 0))
        .await
        .unwrap();
    assert_eq!(affected, vec!["Backlog", "Review", "Done"]);

    let done = column(&store, channel, "Done").await;
    assert_eq!(titles(&done), vec!["A", "Y"]);
    assert_contiguous(&done);

    assert_contiguous(&column(&store, channel, "Backlog").await);
    assert_contiguous(&column(&store, channel, "Review").await);
    assert_eq!(titles(&column(&store, channel, "Review").await), vec!["X"]);
}

#[tokio::test]
async fn multi_move_within_one_column_moves_the_block() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B", "C", "D"]).await;

    let selection = vec![backlog[1].id, backlog[3].id]; // {B, D}
    multi_move(&store, channel, false, &selection, backlog[1].id, &DragLocation::new("Backlog", 0))
        .await
        .unwrap();

    let column = column(&store, channel, "Backlog").await;
    assert_eq!(titles(&column), vec!["B", "D", "A", "C"]);
    assert_contiguous(&column);
}

#[tokio::test]
async fn multi_move_skips_cards_deleted_mid_gesture() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B", "C"]).await;
    store.delete(backlog[2].id).await.unwrap();

    // C vanished but was not the dragged card: the move proceeds without it.
    let selection = vec![backlog[0].id, backlog[2].id];
    multi_move(&store, channel, false, &selection, backlog[0].id, &DragLocation::new("Done", 0))
        .await
        .unwrap();

    let done = column(&store, channel, "Done").await;
    assert_eq!(titles(&done), vec!["A"]);
    assert_contiguous(&done);
}

#[tokio::test]
async fn multi_move_aborts_when_the_dragged_card_vanished() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B"]).await;
    store.delete(backlog[0].id).await.unwrap();

    let selection = vec![backlog[0].id, backlog[1].id];
    let result = multi_move(&store, channel, false, &selection, backlog[0].id, &DragLocation::new("Done", 0)).await;
    assert!(matches!(result.unwrap_err(), ReorderError::NotFound(_)));
}

// =============================================================
// Invariants across operation sequences
// =============================================================

#[tokio::test]
async fn indices_stay_contiguous_across_an_operation_sequence() {
    let store = MemoryItemStore::new();
    let channel = Uuid::new_v4();
    let backlog = seed(&store, channel, "Backlog", &["A", "B", "C", "D"]).await;
    let review = seed(&store, channel, "Review", &["X", "Y"]).await;

    reorder_within_column(&store, channel, false, "Backlog", backlog[3].id, 0)
        .await
        .unwrap();
    move_across_columns(&store, channel, false, backlog[0].id, &DragLocation::new("Review", 1))
        .await
        .unwrap();
    multi_move(
        &store,
        channel,
        false,
        &[review[0].id, backlog[1].id],
        review[0].id,
        &DragLocation::new("Done", 0),
    )
    .await
    .unwrap();

    for status in ["Backlog", "Review", "Done"] {
        assert_contiguous(&column(&store, channel, status).await);
    }
}
