//! Record store — the CRUD contract the packing-list core persists through.
//!
//! ARCHITECTURE
//! ============
//! The core never talks to a database directly. It reads with `get`/`list`
//! and writes with `put`/`delete`, or with `commit` when one operation must
//! touch several records at once (reorder, list cascade, transfers). Both
//! engines apply a `commit` batch atomically: either every write lands or
//! none does.
//!
//! Updates to existing records go through field-level patches rather than
//! whole-record puts. A patch only carries the fields its operation changed,
//! so a write built from a stale read cannot restore a revoked share token
//! or an edit made in between. Item patches also name the owner the caller
//! saw; if the item was deleted or moved since, the patch fails with
//! `Conflict` instead of recreating it.
//!
//! Two collections exist: `lists` (packing-list metadata) and `items` (gear
//! items, catalog-owned or list-owned via `list_id`). Engines enforce two
//! integrity rules so callers cannot corrupt state even when racing:
//! share tokens are unique across lists, and an item's `list_id` must name
//! an existing list. Violations surface as `StoreError::Conflict`.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::model::{GearItem, ItemFields, Owner, PackingList, Unit};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Lists,
    Items,
}

impl Collection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lists => "lists",
            Self::Items => "items",
        }
    }

    /// Singular entity name used in not-found errors.
    #[must_use]
    pub fn entity_name(self) -> &'static str {
        match self {
            Self::Lists => "list",
            Self::Items => "item",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored record of either collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    List(PackingList),
    Item(GearItem),
}

impl Record {
    #[must_use]
    pub fn into_list(self) -> Option<PackingList> {
        match self {
            Self::List(list) => Some(list),
            Self::Item(_) => None,
        }
    }

    #[must_use]
    pub fn into_item(self) -> Option<GearItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::List(_) => None,
        }
    }
}

/// Selection passed to `Store::list`. A filter that does not apply to the
/// requested collection selects nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Owner(Owner),
    ShareToken(String),
}

impl Filter {
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match (self, record) {
            (Self::All, _) => true,
            (Self::Owner(owner), Record::Item(item)) => item.owner() == *owner,
            (Self::ShareToken(token), Record::List(list)) => list.share_token.as_deref() == Some(token.as_str()),
            _ => false,
        }
    }
}

/// Field-level changes to a stored list. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub unit: Option<Unit>,
    pub share_token: Option<String>,
}

/// Field-level changes to a stored item. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub fields: Option<ItemFields>,
    pub packed: Option<bool>,
    pub sort_order: Option<i64>,
    pub owner: Option<Owner>,
}

/// One write inside an atomic `commit` batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Insert or fully replace a record.
    Put(Record),
    /// Patch a list and raise its `updated_at` to at least `at`.
    /// Fails with `NotFound` if the list is gone.
    PatchList { id: Uuid, patch: ListPatch, at: OffsetDateTime },
    /// Patch an item still held by `expected`. Fails with `Conflict` if the
    /// item is gone or now belongs to another owner.
    PatchItem { id: Uuid, expected: Owner, patch: ItemPatch },
    Delete(Collection, Uuid),
}

impl Write {
    /// Bump a list's `updated_at` to now and change nothing else.
    #[must_use]
    pub fn touch(list_id: Uuid) -> Self {
        Self::patch_list(list_id, ListPatch::default())
    }

    #[must_use]
    pub fn patch_list(list_id: Uuid, patch: ListPatch) -> Self {
        Self::PatchList { id: list_id, patch, at: OffsetDateTime::now_utc() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: Uuid },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid stored value: {0}")]
    Decode(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// CONTRACT
// =============================================================================

#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record with `id` exists in `collection`.
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Record, StoreError>;

    /// Fetch every record of `collection` selected by `filter`. Order is
    /// unspecified.
    ///
    /// # Errors
    ///
    /// Returns an engine error if the read fails.
    async fn list(&self, collection: Collection, filter: &Filter) -> Result<Vec<Record>, StoreError>;

    /// Insert or replace one record.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the record breaks an integrity rule.
    async fn put(&self, record: Record) -> Result<Record, StoreError> {
        self.commit(vec![Write::Put(record.clone())]).await?;
        Ok(record)
    }

    /// Delete one record. Deleting a list also deletes its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), StoreError> {
        self.commit(vec![Write::Delete(collection, id)]).await
    }

    /// Apply a batch of writes atomically, in order.
    ///
    /// # Errors
    ///
    /// Returns the first failing write's error; nothing from the batch is
    /// applied in that case.
    async fn commit(&self, writes: Vec<Write>) -> Result<(), StoreError>;
}

// =============================================================================
// TYPED HELPERS
// =============================================================================

/// Load a packing list by id.
///
/// # Errors
///
/// Returns `NotFound` if the list does not exist.
pub async fn get_list(store: &dyn Store, id: Uuid) -> Result<PackingList, StoreError> {
    store
        .get(Collection::Lists, id)
        .await?
        .into_list()
        .ok_or(StoreError::NotFound { collection: Collection::Lists, id })
}

/// Load a gear item by id.
///
/// # Errors
///
/// Returns `NotFound` if the item does not exist.
pub async fn get_item(store: &dyn Store, id: Uuid) -> Result<GearItem, StoreError> {
    store
        .get(Collection::Items, id)
        .await?
        .into_item()
        .ok_or(StoreError::NotFound { collection: Collection::Items, id })
}

/// Every packing list, unordered.
///
/// # Errors
///
/// Returns an engine error if the read fails.
pub async fn all_lists(store: &dyn Store) -> Result<Vec<PackingList>, StoreError> {
    let records = store.list(Collection::Lists, &Filter::All).await?;
    Ok(records.into_iter().filter_map(Record::into_list).collect())
}

/// Every item held by `owner`, unordered.
///
/// # Errors
///
/// Returns an engine error if the read fails.
pub async fn items_of(store: &dyn Store, owner: Owner) -> Result<Vec<GearItem>, StoreError> {
    let records = store.list(Collection::Items, &Filter::Owner(owner)).await?;
    Ok(records.into_iter().filter_map(Record::into_item).collect())
}

/// The list currently holding `token`, if any.
///
/// # Errors
///
/// Returns an engine error if the read fails.
pub async fn list_by_token(store: &dyn Store, token: &str) -> Result<Option<PackingList>, StoreError> {
    let records = store.list(Collection::Lists, &Filter::ShareToken(token.to_owned())).await?;
    Ok(records.into_iter().find_map(Record::into_list))
}
