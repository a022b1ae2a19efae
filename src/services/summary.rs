//! Item aggregator — weight roll-ups over a list's items.
//!
//! DESIGN
//! ======
//! Pure functions, no I/O. Callers recompute on every read instead of
//! caching, so a summary can never lag behind the items it describes.
//! Inputs are assumed clean: kinds and categories were checked when the
//! items were written.

use serde::Serialize;

use crate::model::{Category, GearItem, ItemKind};

// =============================================================================
// KIND SUMMARY
// =============================================================================

/// Per-kind weight totals. `total_pack_g` is always the sum of the three
/// buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub base_weight_g: i64,
    pub consumable_weight_g: i64,
    pub worn_weight_g: i64,
    pub total_pack_g: i64,
}

/// Sum `weight_grams * quantity` per kind. O(n), deterministic.
#[must_use]
pub fn compute_summary(items: &[GearItem]) -> Summary {
    let mut base = 0_i64;
    let mut consumable = 0_i64;
    let mut worn = 0_i64;

    for item in items {
        let weight = item.line_weight_g();
        match item.kind {
            ItemKind::Base => base += weight,
            ItemKind::Consumable => consumable += weight,
            ItemKind::Worn => worn += weight,
        }
    }

    Summary {
        base_weight_g: base,
        consumable_weight_g: consumable,
        worn_weight_g: worn,
        total_pack_g: base + consumable + worn,
    }
}

// =============================================================================
// CATEGORY GROUPING
// =============================================================================

/// One category section: its items in input order and their total weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub items: Vec<&'a GearItem>,
    pub total_weight_g: i64,
}

/// Group items into all nine categories, in enumeration order. Empty
/// categories are kept so every section renders.
#[must_use]
pub fn group_by_category(items: &[GearItem]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Category::ALL
        .into_iter()
        .map(|category| CategoryGroup { category, items: Vec::new(), total_weight_g: 0 })
        .collect();

    for item in items {
        // ALL is in declaration order, so the discriminant is the index.
        let group = &mut groups[item.category as usize];
        group.total_weight_g += item.line_weight_g();
        group.items.push(item);
    }

    groups
}

// =============================================================================
// PACK PROGRESS
// =============================================================================

/// How much of a list has been packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PackProgress {
    pub item_count: usize,
    pub packed_count: usize,
    pub packed_weight_g: i64,
}

#[must_use]
pub fn pack_progress(items: &[GearItem]) -> PackProgress {
    items.iter().fold(PackProgress::default(), |mut acc, item| {
        acc.item_count += 1;
        if item.packed {
            acc.packed_count += 1;
            acc.packed_weight_g += item.line_weight_g();
        }
        acc
    })
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
