//! Gear catalog service — the owner-independent "my gear" inventory.
//!
//! Catalog entries are items with no list. The catalog view lists every item
//! the user owns, annotated with the list currently holding it.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::PackError;
use crate::model::{GearItem, ItemDraft, Owner};
use crate::services::ordering::{self, next_sort_order, sort_items};
use crate::services::packing_list::list_lists;
use crate::store::{self, Collection, Record, Store, Write};

/// One row of the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GearListItem {
    #[serde(flatten)]
    pub item: GearItem,
    pub list_title: Option<String>,
}

/// Create an unattached catalog item at the end of the catalog.
///
/// # Errors
///
/// Returns `PackError::Validation` if the draft is invalid.
pub async fn create_catalog_item(store: &dyn Store, draft: &ItemDraft) -> Result<GearItem, PackError> {
    let fields = draft.validate()?;
    let siblings = store::items_of(store, Owner::Catalog).await?;
    let item = GearItem::new(Owner::Catalog, fields, next_sort_order(&siblings));
    store.put(Record::Item(item.clone())).await?;

    info!(item_id = %item.id, name = %item.name, "created catalog item");
    Ok(item)
}

/// Every item, catalog entries first, then each list's items with lists
/// newest first.
///
/// # Errors
///
/// Returns a store error if a read fails.
pub async fn list_catalog_items(store: &dyn Store) -> Result<Vec<GearListItem>, PackError> {
    let mut catalog = store::items_of(store, Owner::Catalog).await?;
    sort_items(&mut catalog);
    let mut rows: Vec<GearListItem> = catalog
        .into_iter()
        .map(|item| GearListItem { item, list_title: None })
        .collect();

    for list in list_lists(store).await? {
        let mut items = store::items_of(store, Owner::List(list.id)).await?;
        sort_items(&mut items);
        rows.extend(items.into_iter().map(|item| GearListItem { item, list_title: Some(list.title.clone()) }));
    }
    Ok(rows)
}

/// Delete an item wherever it lives. An owning list has its `updated_at`
/// bumped in the same commit.
///
/// # Errors
///
/// Returns `NotFound` if the item does not exist.
pub async fn delete_catalog_item(store: &dyn Store, item_id: Uuid) -> Result<(), PackError> {
    let item = store::get_item(store, item_id).await?;
    let mut writes = vec![Write::Delete(Collection::Items, item_id)];
    if let Owner::List(list_id) = item.owner() {
        writes.push(Write::touch(list_id));
    }
    store.commit(writes).await?;

    info!(%item_id, list_id = ?item.list_id, "deleted gear item");
    Ok(())
}

/// Move an item to `target`, appending it there. A move to the current owner
/// returns the item untouched.
///
/// # Errors
///
/// Returns `NotFound` if the item or the target list does not exist.
pub async fn transfer_item(store: &dyn Store, item_id: Uuid, target: Owner) -> Result<GearItem, PackError> {
    let item = store::get_item(store, item_id).await?;
    if item.owner() == target {
        return Ok(item);
    }
    let moved = ordering::append_at_end(store, target, item_id).await?;
    info!(%item_id, from = ?item.list_id, to = ?moved.list_id, "transferred gear item");
    Ok(moved)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
