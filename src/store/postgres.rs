//! `PostgreSQL` store engine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lists live in `packing_lists`, items in `gear_items` with a nullable
//! `list_id` foreign key (`ON DELETE CASCADE`). Enumerations are stored as
//! their wire strings. Every commit runs in a single transaction; dropping
//! the transaction on an early `?` rolls the whole batch back.
//!
//! Patches are `UPDATE ... COALESCE` statements. Item patches add the
//! expected owner to the `WHERE` clause, so a row that was deleted or moved
//! matches nothing and the batch fails with `Conflict`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Collection, Filter, Record, Store, StoreError, Write};
use crate::model::{Category, GearItem, ItemKind, Owner, PackingList, Unit};

type ListRow = (Uuid, String, String, String, Option<String>, OffsetDateTime, OffsetDateTime);
type ItemRow = (Uuid, Option<Uuid>, String, String, i32, i32, String, String, bool, i64);

const LIST_COLUMNS: &str = "id, title, description, unit, share_token, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, list_id, name, category, weight_grams, quantity, kind, notes, packed, sort_order";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Record, StoreError> {
        let record = match collection {
            Collection::Lists => {
                let row = sqlx::query_as::<_, ListRow>(&format!("SELECT {LIST_COLUMNS} FROM packing_lists WHERE id = $1"))
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
                row.map(list_from_row).transpose()?.map(Record::List)
            }
            Collection::Items => {
                let row = sqlx::query_as::<_, ItemRow>(&format!("SELECT {ITEM_COLUMNS} FROM gear_items WHERE id = $1"))
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
                row.map(item_from_row).transpose()?.map(Record::Item)
            }
        };
        record.ok_or(StoreError::NotFound { collection, id })
    }

    async fn list(&self, collection: Collection, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        match (collection, filter) {
            (Collection::Lists, Filter::All) => {
                let rows = sqlx::query_as::<_, ListRow>(&format!("SELECT {LIST_COLUMNS} FROM packing_lists"))
                    .fetch_all(&self.pool)
                    .await?;
                rows.into_iter().map(|r| list_from_row(r).map(Record::List)).collect()
            }
            (Collection::Lists, Filter::ShareToken(token)) => {
                let rows = sqlx::query_as::<_, ListRow>(&format!(
                    "SELECT {LIST_COLUMNS} FROM packing_lists WHERE share_token = $1"
                ))
                .bind(token)
                .fetch_all(&self.pool)
                .await?;
                rows.into_iter().map(|r| list_from_row(r).map(Record::List)).collect()
            }
            (Collection::Items, Filter::All) => {
                let rows = sqlx::query_as::<_, ItemRow>(&format!("SELECT {ITEM_COLUMNS} FROM gear_items"))
                    .fetch_all(&self.pool)
                    .await?;
                rows.into_iter().map(|r| item_from_row(r).map(Record::Item)).collect()
            }
            (Collection::Items, Filter::Owner(Owner::Catalog)) => {
                let rows = sqlx::query_as::<_, ItemRow>(&format!(
                    "SELECT {ITEM_COLUMNS} FROM gear_items WHERE list_id IS NULL"
                ))
                .fetch_all(&self.pool)
                .await?;
                rows.into_iter().map(|r| item_from_row(r).map(Record::Item)).collect()
            }
            (Collection::Items, Filter::Owner(Owner::List(list_id))) => {
                let rows = sqlx::query_as::<_, ItemRow>(&format!(
                    "SELECT {ITEM_COLUMNS} FROM gear_items WHERE list_id = $1"
                ))
                .bind(list_id)
                .fetch_all(&self.pool)
                .await?;
                rows.into_iter().map(|r| item_from_row(r).map(Record::Item)).collect()
            }
            (Collection::Lists, Filter::Owner(_)) | (Collection::Items, Filter::ShareToken(_)) => Ok(Vec::new()),
        }
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for write in writes {
            apply(&mut tx, write).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// WRITES
// =============================================================================

async fn apply(tx: &mut Transaction<'_, Postgres>, write: Write) -> Result<(), StoreError> {
    match write {
        Write::Put(Record::List(list)) => {
            sqlx::query(
                "INSERT INTO packing_lists (id, title, description, unit, share_token, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 ON CONFLICT (id) DO UPDATE SET \
                     title = EXCLUDED.title, description = EXCLUDED.description, unit = EXCLUDED.unit, \
                     share_token = EXCLUDED.share_token, updated_at = EXCLUDED.updated_at",
            )
            .bind(list.id)
            .bind(&list.title)
            .bind(&list.description)
            .bind(list.unit.as_str())
            .bind(&list.share_token)
            .bind(list.created_at)
            .bind(list.updated_at)
            .execute(&mut **tx)
            .await
            .map_err(map_write_error)?;
        }
        Write::Put(Record::Item(item)) => {
            sqlx::query(
                "INSERT INTO gear_items (id, list_id, name, category, weight_grams, quantity, kind, notes, packed, sort_order) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                 ON CONFLICT (id) DO UPDATE SET \
                     list_id = EXCLUDED.list_id, name = EXCLUDED.name, category = EXCLUDED.category, \
                     weight_grams = EXCLUDED.weight_grams, quantity = EXCLUDED.quantity, kind = EXCLUDED.kind, \
                     notes = EXCLUDED.notes, packed = EXCLUDED.packed, sort_order = EXCLUDED.sort_order",
            )
            .bind(item.id)
            .bind(item.list_id)
            .bind(&item.name)
            .bind(item.category.as_str())
            .bind(item.weight_grams)
            .bind(item.quantity)
            .bind(item.kind.as_str())
            .bind(&item.notes)
            .bind(item.packed)
            .bind(item.sort_order)
            .execute(&mut **tx)
            .await
            .map_err(map_write_error)?;
        }
        Write::PatchList { id, patch, at } => {
            let result = sqlx::query(
                "UPDATE packing_lists SET \
                     title = COALESCE($2::varchar, title), description = COALESCE($3::varchar, description), \
                     unit = COALESCE($4::text, unit), share_token = COALESCE($5::text, share_token), \
                     updated_at = GREATEST(updated_at, $6) \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.unit.map(Unit::as_str))
            .bind(patch.share_token)
            .bind(at)
            .execute(&mut **tx)
            .await
            .map_err(map_write_error)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { collection: Collection::Lists, id });
            }
        }
        Write::PatchItem { id, expected, patch } => {
            let fields = patch.fields;
            let result = sqlx::query(
                "UPDATE gear_items SET \
                     name = COALESCE($2::varchar, name), category = COALESCE($3::text, category), \
                     weight_grams = COALESCE($4::int4, weight_grams), quantity = COALESCE($5::int4, quantity), \
                     kind = COALESCE($6::text, kind), notes = COALESCE($7::text, notes), \
                     packed = COALESCE($8::bool, packed), sort_order = COALESCE($9::int8, sort_order), \
                     list_id = CASE WHEN $10::bool THEN $11::uuid ELSE list_id END \
                 WHERE id = $1 AND list_id IS NOT DISTINCT FROM $12::uuid",
            )
            .bind(id)
            .bind(fields.as_ref().map(|f| f.name.clone()))
            .bind(fields.as_ref().map(|f| f.category.as_str()))
            .bind(fields.as_ref().map(|f| f.weight_grams))
            .bind(fields.as_ref().map(|f| f.quantity))
            .bind(fields.as_ref().map(|f| f.kind.as_str()))
            .bind(fields.as_ref().map(|f| f.notes.clone()))
            .bind(patch.packed)
            .bind(patch.sort_order)
            .bind(patch.owner.is_some())
            .bind(patch.owner.and_then(Owner::list_id))
            .bind(expected.list_id())
            .execute(&mut **tx)
            .await
            .map_err(map_write_error)?;
            if result.rows_affected() == 0 {
                return Err(StoreError::Conflict(format!("item {id} is no longer held by {expected:?}")));
            }
        }
        Write::Delete(collection, id) => {
            let sql = match collection {
                Collection::Lists => "DELETE FROM packing_lists WHERE id = $1",
                Collection::Items => "DELETE FROM gear_items WHERE id = $1",
            };
            let result = sqlx::query(sql).bind(id).execute(&mut **tx).await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound { collection, id });
            }
        }
    }
    Ok(())
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(format!("unique constraint violated: {db_err}"));
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::Conflict(format!("referenced list no longer exists: {db_err}"));
        }
    }
    StoreError::Database(err)
}

// =============================================================================
// ROW DECODING
// =============================================================================

fn list_from_row(row: ListRow) -> Result<PackingList, StoreError> {
    let (id, title, description, unit, share_token, created_at, updated_at) = row;
    let unit = Unit::parse(&unit).ok_or_else(|| StoreError::Decode(format!("unit '{unit}' on list {id}")))?;
    Ok(PackingList { id, title, description, unit, share_token, created_at, updated_at })
}

fn item_from_row(row: ItemRow) -> Result<GearItem, StoreError> {
    let (id, list_id, name, category, weight_grams, quantity, kind, notes, packed, sort_order) = row;
    let category =
        Category::parse(&category).ok_or_else(|| StoreError::Decode(format!("category '{category}' on item {id}")))?;
    let kind = ItemKind::parse(&kind).ok_or_else(|| StoreError::Decode(format!("kind '{kind}' on item {id}")))?;
    Ok(GearItem { id, list_id, name, category, weight_grams, quantity, kind, notes, packed, sort_order })
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
