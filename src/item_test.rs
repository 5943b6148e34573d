use time::macros::date;
use uuid::Uuid;

use super::*;

fn make_item(status: &str, index: i32) -> ContentItem {
    ContentItem {
        id: Uuid::new_v4(),
        channel_id: Uuid::new_v4(),
        title: "Draft".into(),
        status: status.into(),
        index,
        is_epic: false,
        tags: vec![],
        due_date: None,
    }
}

#[test]
fn item_serde_round_trip() {
    let mut item = make_item("Backlog", 3);
    item.tags = vec!["seo".into(), "q3".into()];
    item.due_date = Some(date!(2026 - 09 - 01));

    let json = serde_json::to_string(&item).unwrap();
    let restored: ContentItem = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.id, item.id);
    assert_eq!(restored.status, "Backlog");
    assert_eq!(restored.index, 3);
    assert_eq!(restored.tags, vec!["seo", "q3"]);
    assert_eq!(restored.due_date, Some(date!(2026 - 09 - 01)));
}

#[test]
fn apply_partial_only_touches_present_fields() {
    let mut item = make_item("Backlog", 0);
    item.apply_partial(&PartialContentItem {
        status: Some("Writing".into()),
        index: Some(4),
        ..PartialContentItem::default()
    });
    assert_eq!(item.status, "Writing");
    assert_eq!(item.index, 4);
    assert_eq!(item.title, "Draft"); // untouched
}

#[test]
fn apply_partial_clears_due_date_with_explicit_null() {
    let mut item = make_item("Backlog", 0);
    item.due_date = Some(date!(2026 - 01 - 15));

    // Absent field: unchanged.
    item.apply_partial(&PartialContentItem::default());
    assert!(item.due_date.is_some());

    // Explicit null: cleared.
    item.apply_partial(&PartialContentItem { due_date: Some(None), ..PartialContentItem::default() });
    assert!(item.due_date.is_none());
}

#[test]
fn partial_due_date_deserializes_absent_vs_null() {
    let absent: PartialContentItem = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
    assert!(absent.due_date.is_none());

    let null: PartialContentItem = serde_json::from_str(r#"{"due_date":null}"#).unwrap();
    assert_eq!(null.due_date, Some(None));
}

#[test]
fn status_change_sets_only_status() {
    let partial = PartialContentItem::status_change("Review");
    assert_eq!(partial.status.as_deref(), Some("Review"));
    assert!(partial.title.is_none());
    assert!(partial.index.is_none());
}

#[test]
fn sort_column_orders_by_index_then_id() {
    let mut items = vec![make_item("Backlog", 2), make_item("Backlog", 0), make_item("Backlog", 1)];
    sort_column(&mut items);
    let indices: Vec<i32> = items.iter().map(|it| it.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);

    // Duplicate indices fall back to id order, deterministically.
    let mut dupes = vec![make_item("Backlog", 0), make_item("Backlog", 0)];
    sort_column(&mut dupes);
    assert!(dupes[0].id <= dupes[1].id);
}
