//! Domain model — gear items, packing lists, and their input validation.
//!
//! DESIGN
//! ======
//! Stored records (`GearItem`, `PackingList`) only ever hold validated data.
//! Callers hand in raw drafts (`ItemDraft`, `ListDraft`) which are checked as
//! a whole before anything touches the store, so a rejected request can never
//! leave a partially written record behind.
//!
//! Weights are stored as whole grams. Display units are a per-list preference
//! applied at render time only.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::PackError;

pub const NAME_MAX_CHARS: usize = 120;
pub const NOTES_MAX_CHARS: usize = 2000;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Fixed gear categories. Declaration order is the rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Shelter,
    Sleeping,
    Backpack,
    Clothing,
    Cooking,
    Food,
    Water,
    Electronics,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::Shelter,
        Self::Sleeping,
        Self::Backpack,
        Self::Clothing,
        Self::Cooking,
        Self::Food,
        Self::Water,
        Self::Electronics,
        Self::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shelter => "shelter",
            Self::Sleeping => "sleeping",
            Self::Backpack => "backpack",
            Self::Clothing => "clothing",
            Self::Cooking => "cooking",
            Self::Food => "food",
            Self::Water => "water",
            Self::Electronics => "electronics",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

/// Weight-budget bucket an item's weight contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Base,
    Consumable,
    Worn,
}

impl ItemKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Consumable => "consumable",
            Self::Worn => "worn",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "base" => Some(Self::Base),
            "consumable" => Some(Self::Consumable),
            "worn" => Some(Self::Worn),
            _ => None,
        }
    }
}

/// Display unit preference for a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "oz")]
    Ounce,
}

impl Unit {
    /// Wire form and display suffix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Ounce => "oz",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Self::Gram),
            "oz" | "ounce" | "ounces" => Some(Self::Ounce),
            _ => None,
        }
    }
}

/// Who currently holds an item: the list-less catalog or exactly one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Catalog,
    List(Uuid),
}

impl Owner {
    #[must_use]
    pub fn from_list_id(list_id: Option<Uuid>) -> Self {
        list_id.map_or(Self::Catalog, Self::List)
    }

    #[must_use]
    pub fn list_id(self) -> Option<Uuid> {
        match self {
            Self::Catalog => None,
            Self::List(id) => Some(id),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A gear item. Catalog entries and list items share this shape; `list_id`
/// decides the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearItem {
    pub id: Uuid,
    pub list_id: Option<Uuid>,
    pub name: String,
    pub category: Category,
    pub weight_grams: i32,
    pub quantity: i32,
    pub kind: ItemKind,
    pub notes: String,
    pub packed: bool,
    pub sort_order: i64,
}

impl GearItem {
    #[must_use]
    pub fn new(owner: Owner, fields: ItemFields, sort_order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            list_id: owner.list_id(),
            name: fields.name,
            category: fields.category,
            weight_grams: fields.weight_grams,
            quantity: fields.quantity,
            kind: fields.kind,
            notes: fields.notes,
            packed: false,
            sort_order,
        }
    }

    #[must_use]
    pub fn owner(&self) -> Owner {
        Owner::from_list_id(self.list_id)
    }

    /// `weight_grams * quantity`, widened so sums never overflow.
    #[must_use]
    pub fn line_weight_g(&self) -> i64 {
        i64::from(self.weight_grams) * i64::from(self.quantity)
    }

    /// Overwrite every user-editable field. Identity, owner, position and
    /// packed state are kept.
    pub fn apply(&mut self, fields: ItemFields) {
        self.name = fields.name;
        self.category = fields.category;
        self.weight_grams = fields.weight_grams;
        self.quantity = fields.quantity;
        self.kind = fields.kind;
        self.notes = fields.notes;
    }

    /// The user-editable fields of this item, already known to be valid.
    #[must_use]
    pub fn fields(&self) -> ItemFields {
        ItemFields {
            name: self.name.clone(),
            category: self.category,
            weight_grams: self.weight_grams,
            quantity: self.quantity,
            kind: self.kind,
            notes: self.notes.clone(),
        }
    }
}

/// Packing-list metadata. Items are separate records pointing back via
/// `GearItem::list_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingList {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub unit: Unit,
    pub share_token: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PackingList {
    #[must_use]
    pub fn new(fields: ListFields) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            unit: Unit::default(),
            share_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` to `at`. Never moves backwards even if the clock does.
    pub fn touch_at(&mut self, at: OffsetDateTime) {
        if at > self.updated_at {
            self.updated_at = at;
        }
    }
}

// =============================================================================
// INPUT DRAFTS
// =============================================================================

/// Raw item input as received from a caller. Unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub weight_grams: i64,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub name: String,
    pub category: Category,
    pub weight_grams: i32,
    pub quantity: i32,
    pub kind: ItemKind,
    pub notes: String,
}

impl ItemDraft {
    /// Check the full item shape. Missing category, quantity and kind fall
    /// back to `other`, `1` and `base`.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<ItemFields, PackError> {
        let name = bounded_text("name", &self.name, NAME_MAX_CHARS, true)?;
        let category = match self.category.as_deref() {
            None => Category::Other,
            Some(raw) => Category::parse(raw.trim())
                .ok_or_else(|| PackError::validation(format!("unknown category: {raw}")))?,
        };
        let kind = match self.kind.as_deref() {
            None => ItemKind::Base,
            Some(raw) => {
                ItemKind::parse(raw.trim()).ok_or_else(|| PackError::validation(format!("unknown kind: {raw}")))?
            }
        };
        let weight_grams = positive_i32("weight_grams", self.weight_grams)?;
        let quantity = positive_i32("quantity", self.quantity.unwrap_or(1))?;
        let notes = bounded_text("notes", self.notes.as_deref().unwrap_or_default(), NOTES_MAX_CHARS, false)?;

        Ok(ItemFields { name, category, weight_grams, quantity, kind, notes })
    }
}

/// Raw list metadata input. Unvalidated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Validated list metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFields {
    pub title: String,
    pub description: String,
}

impl ListDraft {
    /// # Errors
    ///
    /// Returns `PackError::Validation` for an empty or over-long title or an
    /// over-long description.
    pub fn validate(&self) -> Result<ListFields, PackError> {
        let title = bounded_text("title", &self.title, TITLE_MAX_CHARS, true)?;
        let description = bounded_text(
            "description",
            self.description.as_deref().unwrap_or_default(),
            DESCRIPTION_MAX_CHARS,
            false,
        )?;
        Ok(ListFields { title, description })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn bounded_text(field: &str, raw: &str, max_chars: usize, required: bool) -> Result<String, PackError> {
    let trimmed = raw.trim();
    if required && trimmed.is_empty() {
        return Err(PackError::validation(format!("{field} is required")));
    }
    let len = trimmed.chars().count();
    if len > max_chars {
        return Err(PackError::validation(format!("{field} must be at most {max_chars} characters (got {len})")));
    }
    Ok(trimmed.to_owned())
}

fn positive_i32(field: &str, value: i64) -> Result<i32, PackError> {
    if value < 1 {
        return Err(PackError::validation(format!("{field} must be at least 1 (got {value})")));
    }
    i32::try_from(value).map_err(|_| PackError::validation(format!("{field} is too large (got {value})")))
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
