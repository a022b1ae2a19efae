//! Ordering manager — explicit positions for items within an owner.
//!
//! DESIGN
//! ======
//! Items carry an integer `sort_order`. Iteration order is `sort_order`
//! ascending with `id` ascending as the tie-break, so two items that end up
//! sharing a position after racing writes still have a total order and
//! nothing ever fails on a tie.
//!
//! `reorder` rewrites every position of a list in one atomic commit: either
//! the whole permutation lands or the old order stays. It writes positions
//! only, so an item removed meanwhile fails the batch instead of coming back,
//! and a concurrent edit to an item's other fields is kept.

use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use crate::error::PackError;
use crate::model::{GearItem, Owner};
use crate::store::{self, ItemPatch, Store, Write};

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Sort items into display order. Never fails on duplicate positions.
pub fn sort_items(items: &mut [GearItem]) {
    items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
}

/// The position strictly after every item in `items` (0 when empty).
#[must_use]
pub fn next_sort_order(items: &[GearItem]) -> i64 {
    items
        .iter()
        .map(|i| i.sort_order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Check that `ordered_ids` is exactly a permutation of the ids in `items`.
///
/// # Errors
///
/// Returns `PackError::Validation` on a duplicate, unknown or missing id.
pub fn validate_permutation(items: &[GearItem], ordered_ids: &[Uuid]) -> Result<(), PackError> {
    let current: HashSet<Uuid> = items.iter().map(|i| i.id).collect();
    let mut seen = HashSet::with_capacity(ordered_ids.len());

    for id in ordered_ids {
        if !seen.insert(*id) {
            return Err(PackError::validation(format!("duplicate item id in order: {id}")));
        }
        if !current.contains(id) {
            return Err(PackError::validation(format!("item {id} is not in this list")));
        }
    }

    let missing = current.len() - seen.len();
    if missing > 0 {
        return Err(PackError::validation(format!("order is missing {missing} item(s) of this list")));
    }
    Ok(())
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Rewrite a list's order to match `ordered_item_ids` and return the items
/// in their new order.
///
/// # Errors
///
/// Returns `NotFound` for an unknown list and `Validation` if the ids are not
/// exactly a permutation of the list's current items. Returns `Conflict` if
/// an item is removed or moved away before the new order lands. Nothing is
/// written on error.
pub async fn reorder(store: &dyn Store, list_id: Uuid, ordered_item_ids: &[Uuid]) -> Result<Vec<GearItem>, PackError> {
    store::get_list(store, list_id).await?;
    let items = store::items_of(store, Owner::List(list_id)).await?;
    validate_permutation(&items, ordered_item_ids)?;

    let mut writes: Vec<Write> = ordered_item_ids
        .iter()
        .zip(0_i64..)
        .map(|(id, position)| Write::PatchItem {
            id: *id,
            expected: Owner::List(list_id),
            patch: ItemPatch { sort_order: Some(position), ..ItemPatch::default() },
        })
        .collect();
    writes.push(Write::touch(list_id));

    store.commit(writes).await?;
    info!(%list_id, count = ordered_item_ids.len(), "reordered list items");

    let mut items = store::items_of(store, Owner::List(list_id)).await?;
    sort_items(&mut items);
    Ok(items)
}

/// Place an item at the end of `owner`, transferring it there if another
/// owner holds it. Every list losing or gaining the item gets its
/// `updated_at` bumped in the same commit.
///
/// # Errors
///
/// Returns `NotFound` if the item or the target list does not exist, and
/// `Conflict` if the item changes owner or disappears before the move lands.
pub async fn append_at_end(store: &dyn Store, owner: Owner, item_id: Uuid) -> Result<GearItem, PackError> {
    let item = store::get_item(store, item_id).await?;
    let mut writes = Vec::with_capacity(3);

    if let Owner::List(list_id) = owner {
        store::get_list(store, list_id).await?;
        writes.push(Write::touch(list_id));
    }
    if let Owner::List(previous) = item.owner() {
        if item.owner() != owner {
            writes.push(Write::touch(previous));
        }
    }

    let mut siblings = store::items_of(store, owner).await?;
    siblings.retain(|i| i.id != item.id);
    let sort_order = next_sort_order(&siblings);
    let patch = ItemPatch { sort_order: Some(sort_order), owner: Some(owner), ..ItemPatch::default() };
    writes.push(Write::PatchItem { id: item_id, expected: item.owner(), patch });

    store.commit(writes).await?;
    info!(%item_id, sort_order, "appended item at end");
    Ok(store::get_item(store, item_id).await?)
}

#[cfg(test)]
#[path = "ordering_test.rs"]
mod tests;
