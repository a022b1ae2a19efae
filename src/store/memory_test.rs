use super::*;
use crate::model::{ItemKind, Owner};
use crate::state::test_helpers::{fields, new_list};
use crate::store::{ItemPatch, ListPatch, get_item, get_list, items_of, list_by_token};

async fn seeded() -> (MemoryStore, PackingList) {
    let store = MemoryStore::new();
    let list = new_list("Trip");
    store.put(Record::List(list.clone())).await.unwrap();
    (store, list)
}

#[tokio::test]
async fn get_missing_record_is_not_found() {
    let store = MemoryStore::new();
    let id = Uuid::new_v4();
    let err = store.get(Collection::Lists, id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { collection: Collection::Lists, id: got } if got == id));
}

#[tokio::test]
async fn put_then_get_round_trips() {
    let (store, list) = seeded().await;
    assert_eq!(get_list(&store, list.id).await.unwrap(), list);

    let item = GearItem::new(Owner::List(list.id), fields("Tent", 800, ItemKind::Base), 0);
    store.put(Record::Item(item.clone())).await.unwrap();
    assert_eq!(get_item(&store, item.id).await.unwrap(), item);
}

#[tokio::test]
async fn list_filters_by_owner() {
    let (store, list) = seeded().await;
    let in_list = GearItem::new(Owner::List(list.id), fields("Tent", 800, ItemKind::Base), 0);
    let in_catalog = GearItem::new(Owner::Catalog, fields("Stove", 18, ItemKind::Base), 0);
    store
        .commit(vec![Write::Put(Record::Item(in_list.clone())), Write::Put(Record::Item(in_catalog.clone()))])
        .await
        .unwrap();

    let list_items = items_of(&store, Owner::List(list.id)).await.unwrap();
    assert_eq!(list_items, vec![in_list]);
    let catalog_items = items_of(&store, Owner::Catalog).await.unwrap();
    assert_eq!(catalog_items, vec![in_catalog]);
}

#[tokio::test]
async fn deleting_list_cascades_to_items() {
    let (store, list) = seeded().await;
    let item = GearItem::new(Owner::List(list.id), fields("Tent", 800, ItemKind::Base), 0);
    let keep = GearItem::new(Owner::Catalog, fields("Stove", 18, ItemKind::Base), 0);
    store
        .commit(vec![Write::Put(Record::Item(item.clone())), Write::Put(Record::Item(keep.clone()))])
        .await
        .unwrap();

    store.delete(Collection::Lists, list.id).await.unwrap();

    assert!(matches!(get_item(&store, item.id).await, Err(StoreError::NotFound { .. })));
    assert_eq!(get_item(&store, keep.id).await.unwrap(), keep);
}

#[tokio::test]
async fn delete_missing_record_is_not_found() {
    let store = MemoryStore::new();
    let err = store.delete(Collection::Items, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { collection: Collection::Items, .. }));
}

#[tokio::test]
async fn failed_commit_applies_nothing() {
    let (store, list) = seeded().await;
    let first = GearItem::new(Owner::List(list.id), fields("Tent", 800, ItemKind::Base), 0);
    let err = store
        .commit(vec![
            Write::Put(Record::Item(first.clone())),
            Write::Delete(Collection::Items, Uuid::new_v4()),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(matches!(get_item(&store, first.id).await, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn share_tokens_are_unique_across_lists() {
    let (store, mut first) = seeded().await;
    first.share_token = Some("abc".into());
    store.put(Record::List(first.clone())).await.unwrap();

    let mut second = new_list("Other");
    second.share_token = Some("abc".into());
    let err = store.put(Record::List(second)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    // Re-putting the owner with its own token is fine.
    store.put(Record::List(first.clone())).await.unwrap();
    assert_eq!(list_by_token(&store, "abc").await.unwrap().map(|l| l.id), Some(first.id));
}

#[tokio::test]
async fn item_pointing_at_missing_list_conflicts() {
    let store = MemoryStore::new();
    let orphan = GearItem::new(Owner::List(Uuid::new_v4()), fields("Tent", 800, ItemKind::Base), 0);
    let err = store.put(Record::Item(orphan)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn token_filter_ignores_items_collection() {
    let (store, _) = seeded().await;
    let records = store.list(Collection::Items, &Filter::ShareToken("abc".into())).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn patch_list_keeps_fields_it_does_not_name() {
    let (store, list) = seeded().await;
    store
        .commit(vec![Write::patch_list(list.id, ListPatch { share_token: Some("abc".into()), ..ListPatch::default() })])
        .await
        .unwrap();
    store
        .commit(vec![Write::patch_list(list.id, ListPatch { title: Some("Renamed".into()), ..ListPatch::default() })])
        .await
        .unwrap();

    let stored = get_list(&store, list.id).await.unwrap();
    assert_eq!(stored.title, "Renamed");
    assert_eq!(stored.share_token.as_deref(), Some("abc"));
    assert!(stored.updated_at >= list.updated_at);
}

#[tokio::test]
async fn touch_on_missing_list_is_not_found() {
    let store = MemoryStore::new();
    let id = Uuid::new_v4();
    let err = store.commit(vec![Write::touch(id)]).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { collection: Collection::Lists, .. }));
}

#[tokio::test]
async fn patch_item_never_recreates_a_deleted_item() {
    let (store, list) = seeded().await;
    let item = GearItem::new(Owner::List(list.id), fields("Tent", 800, ItemKind::Base), 0);
    store.put(Record::Item(item.clone())).await.unwrap();
    store.delete(Collection::Items, item.id).await.unwrap();

    let patch = ItemPatch { sort_order: Some(3), ..ItemPatch::default() };
    let err = store
        .commit(vec![Write::PatchItem { id: item.id, expected: Owner::List(list.id), patch }])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(items_of(&store, Owner::List(list.id)).await.unwrap().is_empty());
}

#[tokio::test]
async fn patch_item_rejects_an_item_that_moved() {
    let (store, list) = seeded().await;
    let item = GearItem::new(Owner::Catalog, fields("Stove", 18, ItemKind::Base), 0);
    store.put(Record::Item(item.clone())).await.unwrap();

    let patch = ItemPatch { packed: Some(true), ..ItemPatch::default() };
    let err = store
        .commit(vec![Write::PatchItem { id: item.id, expected: Owner::List(list.id), patch }])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(!get_item(&store, item.id).await.unwrap().packed);
}

#[tokio::test]
async fn patch_item_moves_owner_and_checks_target() {
    let (store, list) = seeded().await;
    let item = GearItem::new(Owner::Catalog, fields("Stove", 18, ItemKind::Base), 0);
    store.put(Record::Item(item.clone())).await.unwrap();

    let missing = Owner::List(Uuid::new_v4());
    let patch = ItemPatch { owner: Some(missing), ..ItemPatch::default() };
    let err = store
        .commit(vec![Write::PatchItem { id: item.id, expected: Owner::Catalog, patch }])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let patch = ItemPatch { owner: Some(Owner::List(list.id)), sort_order: Some(0), ..ItemPatch::default() };
    store
        .commit(vec![Write::PatchItem { id: item.id, expected: Owner::Catalog, patch }])
        .await
        .unwrap();
    assert_eq!(get_item(&store, item.id).await.unwrap().list_id, Some(list.id));
}

#[tokio::test]
async fn patch_list_token_must_be_unique() {
    let (store, first) = seeded().await;
    let second = new_list("Other");
    store.put(Record::List(second.clone())).await.unwrap();
    let token = ListPatch { share_token: Some("dup".into()), ..ListPatch::default() };
    store.commit(vec![Write::patch_list(first.id, token.clone())]).await.unwrap();

    let err = store.commit(vec![Write::patch_list(second.id, token)]).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(list_by_token(&store, "dup").await.unwrap().is_some_and(|l| l.id == first.id));
}
