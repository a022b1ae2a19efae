//! In-memory store engine.
//!
//! DESIGN
//! ======
//! Both collections live behind one `RwLock`. A commit stages its writes on
//! a copy of the tables and swaps the copy in only after every write has
//! passed the integrity checks, so readers never observe half a batch.
//! Patches mutate the staged record in place; the checks they share with
//! `Put` live in `check_token_free` and `check_list_exists`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, Filter, Record, Store, StoreError, Write};
use crate::model::{GearItem, PackingList};

#[derive(Debug, Clone, Default)]
struct Tables {
    lists: HashMap<Uuid, PackingList>,
    items: HashMap<Uuid, GearItem>,
}

impl Tables {
    fn apply(&mut self, write: Write) -> Result<(), StoreError> {
        match write {
            Write::Put(Record::List(list)) => {
                if let Some(token) = list.share_token.as_deref() {
                    self.check_token_free(list.id, token)?;
                }
                self.lists.insert(list.id, list);
            }
            Write::Put(Record::Item(item)) => {
                self.check_list_exists(item.id, item.list_id)?;
                self.items.insert(item.id, item);
            }
            Write::PatchList { id, patch, at } => {
                if let Some(token) = patch.share_token.as_deref() {
                    self.check_token_free(id, token)?;
                }
                let list = self
                    .lists
                    .get_mut(&id)
                    .ok_or(StoreError::NotFound { collection: Collection::Lists, id })?;
                if let Some(title) = patch.title {
                    list.title = title;
                }
                if let Some(description) = patch.description {
                    list.description = description;
                }
                if let Some(unit) = patch.unit {
                    list.unit = unit;
                }
                if let Some(token) = patch.share_token {
                    list.share_token = Some(token);
                }
                list.touch_at(at);
            }
            Write::PatchItem { id, expected, patch } => {
                if let Some(owner) = patch.owner {
                    self.check_list_exists(id, owner.list_id())?;
                }
                let item = self
                    .items
                    .get_mut(&id)
                    .filter(|item| item.owner() == expected)
                    .ok_or_else(|| StoreError::Conflict(format!("item {id} is no longer held by {expected:?}")))?;
                if let Some(fields) = patch.fields {
                    item.apply(fields);
                }
                if let Some(packed) = patch.packed {
                    item.packed = packed;
                }
                if let Some(sort_order) = patch.sort_order {
                    item.sort_order = sort_order;
                }
                if let Some(owner) = patch.owner {
                    item.list_id = owner.list_id();
                }
            }
            Write::Delete(Collection::Lists, id) => {
                if self.lists.remove(&id).is_none() {
                    return Err(StoreError::NotFound { collection: Collection::Lists, id });
                }
                self.items.retain(|_, item| item.list_id != Some(id));
            }
            Write::Delete(Collection::Items, id) => {
                if self.items.remove(&id).is_none() {
                    return Err(StoreError::NotFound { collection: Collection::Items, id });
                }
            }
        }
        Ok(())
    }

    fn check_token_free(&self, list_id: Uuid, token: &str) -> Result<(), StoreError> {
        let taken = self
            .lists
            .values()
            .any(|other| other.id != list_id && other.share_token.as_deref() == Some(token));
        if taken {
            return Err(StoreError::Conflict("share token already in use".into()));
        }
        Ok(())
    }

    fn check_list_exists(&self, item_id: Uuid, list_id: Option<Uuid>) -> Result<(), StoreError> {
        match list_id {
            Some(list_id) if !self.lists.contains_key(&list_id) => {
                Err(StoreError::Conflict(format!("item {item_id} references missing list {list_id}")))
            }
            _ => Ok(()),
        }
    }
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Record, StoreError> {
        let tables = self.tables.read().await;
        let record = match collection {
            Collection::Lists => tables.lists.get(&id).cloned().map(Record::List),
            Collection::Items => tables.items.get(&id).cloned().map(Record::Item),
        };
        record.ok_or(StoreError::NotFound { collection, id })
    }

    async fn list(&self, collection: Collection, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        let records: Vec<Record> = match collection {
            Collection::Lists => tables.lists.values().cloned().map(Record::List).collect(),
            Collection::Items => tables.items.values().cloned().map(Record::Item).collect(),
        };
        Ok(records.into_iter().filter(|r| filter.matches(r)).collect())
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        for write in writes {
            staged.apply(write)?;
        }
        *tables = staged;
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
