//! Sample gear seeding for fresh installs and demos.

use std::collections::HashSet;

use tracing::info;

use crate::error::PackError;
use crate::model::{Category, GearItem, ItemFields, ItemKind, Owner};
use crate::services::ordering::next_sort_order;
use crate::store::{self, Record, Store, Write};

struct SampleItem {
    name: &'static str,
    category: Category,
    weight_grams: i32,
    quantity: i32,
    kind: ItemKind,
    notes: &'static str,
}

const fn sample(
    name: &'static str,
    category: Category,
    weight_grams: i32,
    quantity: i32,
    kind: ItemKind,
    notes: &'static str,
) -> SampleItem {
    SampleItem { name, category, weight_grams, quantity, kind, notes }
}

/// A standard two-night ultralight kit.
const SAMPLE_GEAR: &[SampleItem] = &[
    sample("DCF tarp", Category::Shelter, 310, 1, ItemKind::Base, "with guylines"),
    sample("Polycryo groundsheet", Category::Shelter, 55, 1, ItemKind::Base, ""),
    sample("Stake set", Category::Shelter, 82, 8, ItemKind::Base, "aluminium"),
    sample("Down quilt 20F", Category::Sleeping, 560, 1, ItemKind::Base, "three season"),
    sample("Inflatable pad", Category::Sleeping, 415, 1, ItemKind::Base, "R 3.5"),
    sample("Foam sit pad", Category::Sleeping, 170, 1, ItemKind::Base, "for breaks"),
    sample("Backpack 40L", Category::Backpack, 690, 1, ItemKind::Base, "frameless"),
    sample("Dry bag", Category::Backpack, 36, 3, ItemKind::Base, "assorted sizes"),
    sample("Wind shell", Category::Clothing, 105, 1, ItemKind::Worn, ""),
    sample("Rain jacket", Category::Clothing, 198, 1, ItemKind::Base, "waterproof breathable"),
    sample("Rain pants", Category::Clothing, 156, 1, ItemKind::Base, "emergency"),
    sample("Down jacket", Category::Clothing, 245, 1, ItemKind::Base, "camp layer"),
    sample("Spare socks", Category::Clothing, 43, 1, ItemKind::Base, "sleep socks"),
    sample("Alcohol stove", Category::Cooking, 18, 1, ItemKind::Base, "no pot stand needed"),
    sample("Titanium mug 550ml", Category::Cooking, 72, 1, ItemKind::Base, "doubles as pot"),
    sample("Spoon", Category::Cooking, 14, 1, ItemKind::Base, "long handle"),
    sample("Stove alcohol", Category::Food, 250, 1, ItemKind::Consumable, "two days"),
    sample("Trail snacks", Category::Food, 480, 1, ItemKind::Consumable, "bars and nuts"),
    sample("Freeze-dried dinner", Category::Food, 220, 2, ItemKind::Consumable, "two nights"),
    sample("Water filter", Category::Water, 58, 1, ItemKind::Base, "0.1 micron"),
    sample("Soft bottle 1L", Category::Water, 38, 2, ItemKind::Base, "includes spare"),
    sample("Carried water 1.5L", Category::Water, 1500, 1, ItemKind::Consumable, "at trailhead"),
    sample("Headlamp", Category::Electronics, 52, 1, ItemKind::Base, "with spare battery"),
    sample("Power bank 10000", Category::Electronics, 182, 1, ItemKind::Base, "with cable"),
    sample("First aid kit", Category::Other, 95, 1, ItemKind::Base, "plasters and meds"),
    sample("Map and compass", Category::Other, 61, 1, ItemKind::Base, "paper map"),
];

/// Insert the sample kit into the catalog, skipping any name already there.
/// Returns how many items were added.
///
/// # Errors
///
/// Returns a store error if reading the catalog or the commit fails.
pub async fn seed_sample_gear(store: &dyn Store) -> Result<usize, PackError> {
    let existing = store::items_of(store, Owner::Catalog).await?;
    let known: HashSet<&str> = existing.iter().map(|i| i.name.as_str()).collect();
    let mut next = next_sort_order(&existing);

    let mut writes = Vec::new();
    for sample in SAMPLE_GEAR.iter().filter(|s| !known.contains(s.name)) {
        let fields = ItemFields {
            name: sample.name.to_owned(),
            category: sample.category,
            weight_grams: sample.weight_grams,
            quantity: sample.quantity,
            kind: sample.kind,
            notes: sample.notes.to_owned(),
        };
        writes.push(Write::Put(Record::Item(GearItem::new(Owner::Catalog, fields, next))));
        next += 1;
    }

    let added = writes.len();
    if added > 0 {
        store.commit(writes).await?;
    }
    info!(added, skipped = SAMPLE_GEAR.len() - added, "seeded sample gear");
    Ok(added)
}

#[cfg(test)]
#[path = "sample_data_test.rs"]
mod tests;
