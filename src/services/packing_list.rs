//! Packing list service — list CRUD, list-scoped item CRUD, and detail reads.
//!
//! DESIGN
//! ======
//! Every mutation validates its whole input first, then writes the changed
//! fields plus the list's bumped `updated_at` in a single store commit. Only
//! the fields an operation owns are written, so concurrent edits to other
//! fields (a share-token rotation, another item's packed flag) survive. The
//! returned `ListDetail` is rebuilt from the store afterwards, so the summary
//! a caller sees is always computed from committed items.
//!
//! Creating from a template only reads the template list; the clones get
//! fresh ids and a dense `sort_order` sequence in the template's order.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::PackError;
use crate::model::{Category, GearItem, ItemDraft, ListDraft, Owner, PackingList, Unit};
use crate::services::ordering::{next_sort_order, sort_items};
use crate::services::summary::{PackProgress, Summary, compute_summary, group_by_category, pack_progress};
use crate::services::units::{DisplaySummary, display_summary};
use crate::store::{self, Collection, ItemPatch, ListPatch, Record, Store, StoreError, Write};

// =============================================================================
// TYPES
// =============================================================================

/// Per-category totals for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub item_count: usize,
    pub total_weight_g: i64,
}

/// A list with its ordered items and every derived aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ListDetail {
    #[serde(flatten)]
    pub list: PackingList,
    pub items: Vec<GearItem>,
    pub summary: Summary,
    pub display: DisplaySummary,
    pub progress: PackProgress,
    pub categories: Vec<CategoryTotal>,
}

impl ListDetail {
    /// Build the detail view. `items` are sorted into display order here.
    #[must_use]
    pub fn build(list: PackingList, mut items: Vec<GearItem>) -> Self {
        sort_items(&mut items);
        let summary = compute_summary(&items);
        let display = display_summary(&summary, list.unit);
        let progress = pack_progress(&items);
        let categories = group_by_category(&items)
            .into_iter()
            .map(|g| CategoryTotal { category: g.category, item_count: g.items.len(), total_weight_g: g.total_weight_g })
            .collect();
        Self { list, items, summary, display, progress, categories }
    }
}

// =============================================================================
// LIST CRUD
// =============================================================================

/// Create a list, optionally pre-populated from a template list.
///
/// # Errors
///
/// Returns `Validation` for bad metadata and `NotFound` if `template_id`
/// names no list.
pub async fn create_list(
    store: &dyn Store,
    draft: &ListDraft,
    template_id: Option<Uuid>,
) -> Result<ListDetail, PackError> {
    let fields = draft.validate()?;
    let list = PackingList::new(fields);

    let mut clones = Vec::new();
    if let Some(template_id) = template_id {
        store::get_list(store, template_id).await?;
        let mut template_items = store::items_of(store, Owner::List(template_id)).await?;
        sort_items(&mut template_items);
        clones = template_items
            .iter()
            .zip(0_i64..)
            .map(|(source, position)| GearItem::new(Owner::List(list.id), source.fields(), position))
            .collect();
    }

    let mut writes = Vec::with_capacity(clones.len() + 1);
    writes.push(Write::Put(Record::List(list.clone())));
    writes.extend(clones.iter().cloned().map(|item| Write::Put(Record::Item(item))));
    store.commit(writes).await?;

    info!(list_id = %list.id, ?template_id, cloned = clones.len(), "created packing list");
    Ok(ListDetail::build(list, clones))
}

/// All lists, newest first, without items.
///
/// # Errors
///
/// Returns a store error if the read fails.
pub async fn list_lists(store: &dyn Store) -> Result<Vec<PackingList>, PackError> {
    let mut lists = store::all_lists(store).await?;
    lists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(lists)
}

/// Read one list with items and aggregates.
///
/// # Errors
///
/// Returns `NotFound` if the list does not exist.
pub async fn get_list(store: &dyn Store, list_id: Uuid) -> Result<ListDetail, PackError> {
    let list = load_list(store, list_id).await?;
    detail(store, list).await
}

/// Replace a list's title and description.
///
/// # Errors
///
/// Returns `Validation` for bad metadata and `NotFound` for an unknown list.
pub async fn update_list_meta(store: &dyn Store, list_id: Uuid, draft: &ListDraft) -> Result<ListDetail, PackError> {
    let fields = draft.validate()?;
    let patch = ListPatch { title: Some(fields.title), description: Some(fields.description), ..ListPatch::default() };
    store.commit(vec![Write::patch_list(list_id, patch)]).await?;

    info!(%list_id, "updated list metadata");
    get_list(store, list_id).await
}

/// Change the display unit. Stored weights are untouched.
///
/// # Errors
///
/// Returns `NotFound` for an unknown list.
pub async fn set_unit(store: &dyn Store, list_id: Uuid, unit: Unit) -> Result<ListDetail, PackError> {
    let patch = ListPatch { unit: Some(unit), ..ListPatch::default() };
    store.commit(vec![Write::patch_list(list_id, patch)]).await?;

    info!(%list_id, unit = unit.as_str(), "set list unit");
    get_list(store, list_id).await
}

/// Delete a list together with all of its items. Its share token stops
/// resolving with it.
///
/// # Errors
///
/// Returns `NotFound` for an unknown list.
pub async fn delete_list(store: &dyn Store, list_id: Uuid) -> Result<(), PackError> {
    store.delete(Collection::Lists, list_id).await?;
    info!(%list_id, "deleted packing list");
    Ok(())
}

// =============================================================================
// ITEM CRUD
// =============================================================================

/// Add a new item at the end of a list.
///
/// # Errors
///
/// Returns `Validation` for a bad item and `NotFound` for an unknown list.
pub async fn add_item(store: &dyn Store, list_id: Uuid, draft: &ItemDraft) -> Result<ListDetail, PackError> {
    let fields = draft.validate()?;
    load_list(store, list_id).await?;
    let items = store::items_of(store, Owner::List(list_id)).await?;

    let item = GearItem::new(Owner::List(list_id), fields, next_sort_order(&items));
    let item_id = item.id;
    store.commit(vec![Write::Put(Record::Item(item)), Write::touch(list_id)]).await?;

    info!(%list_id, %item_id, "added item to list");
    get_list(store, list_id).await
}

/// Replace an item's editable fields.
///
/// # Errors
///
/// Returns `Validation` for a bad item, `NotFound` for an unknown list or an
/// item that does not belong to `list_id`, and `Conflict` if the item is
/// removed or moved while the update is in flight.
pub async fn update_item(
    store: &dyn Store,
    list_id: Uuid,
    item_id: Uuid,
    draft: &ItemDraft,
) -> Result<ListDetail, PackError> {
    let fields = draft.validate()?;
    let patch = ItemPatch { fields: Some(fields), ..ItemPatch::default() };
    patch_item(store, list_id, item_id, patch).await?;

    info!(%list_id, %item_id, "updated list item");
    get_list(store, list_id).await
}

/// Remove an item from a list, deleting it.
///
/// # Errors
///
/// Returns `NotFound` for an unknown list or an item that does not belong to
/// `list_id`.
pub async fn remove_item(store: &dyn Store, list_id: Uuid, item_id: Uuid) -> Result<ListDetail, PackError> {
    load_list(store, list_id).await?;
    item_in_list(store, list_id, item_id).await?;

    match store.commit(vec![Write::Delete(Collection::Items, item_id), Write::touch(list_id)]).await {
        Ok(()) => {}
        Err(StoreError::NotFound { collection: Collection::Items, .. }) => return Err(PackError::item_not_found(item_id)),
        Err(other) => return Err(other.into()),
    }

    info!(%list_id, %item_id, "removed list item");
    get_list(store, list_id).await
}

/// Mark an item packed or unpacked.
///
/// # Errors
///
/// Returns `NotFound` for an unknown list or an item that does not belong to
/// `list_id`, and `Conflict` if the item is removed or moved meanwhile.
pub async fn set_packed(store: &dyn Store, list_id: Uuid, item_id: Uuid, packed: bool) -> Result<ListDetail, PackError> {
    let patch = ItemPatch { packed: Some(packed), ..ItemPatch::default() };
    patch_item(store, list_id, item_id, patch).await?;

    info!(%list_id, %item_id, packed, "set item packed state");
    get_list(store, list_id).await
}

// =============================================================================
// HELPERS
// =============================================================================

async fn load_list(store: &dyn Store, list_id: Uuid) -> Result<PackingList, PackError> {
    Ok(store::get_list(store, list_id).await?)
}

/// Patch one item of a list and bump the list in the same commit.
async fn patch_item(store: &dyn Store, list_id: Uuid, item_id: Uuid, patch: ItemPatch) -> Result<(), PackError> {
    load_list(store, list_id).await?;
    item_in_list(store, list_id, item_id).await?;
    store
        .commit(vec![Write::PatchItem { id: item_id, expected: Owner::List(list_id), patch }, Write::touch(list_id)])
        .await?;
    Ok(())
}

async fn detail(store: &dyn Store, list: PackingList) -> Result<ListDetail, PackError> {
    let items = store::items_of(store, Owner::List(list.id)).await?;
    Ok(ListDetail::build(list, items))
}

/// Load an item, treating one owned by any other list as absent.
async fn item_in_list(store: &dyn Store, list_id: Uuid, item_id: Uuid) -> Result<GearItem, PackError> {
    match store::get_item(store, item_id).await {
        Ok(item) if item.list_id == Some(list_id) => Ok(item),
        Ok(_) | Err(StoreError::NotFound { .. }) => Err(PackError::item_not_found(item_id)),
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
#[path = "packing_list_test.rs"]
mod tests;
