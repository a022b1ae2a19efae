//! Share gateway — opaque tokens and the read-only live list projection.
//!
//! TRADE-OFFS
//! ==========
//! A list is shared exactly when it carries a token. Regeneration overwrites
//! the token in one write, so the previous token stops resolving on the very
//! next read; there is no grace period for old links.
//!
//! The shared view is recomputed on every request from committed state. It
//! exposes no internal ids; `position` gives a stable rendering order.

use std::fmt::Write as _;

use rand::Rng;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::PackError;
use crate::model::{Category, ItemKind, Owner, Unit};
use crate::services::packing_list::{CategoryTotal, ListDetail};
use crate::services::summary::Summary;
use crate::services::units::{DisplaySummary, to_display};
use crate::store::{self, ListPatch, Store, Write};

// =============================================================================
// TOKENS
// =============================================================================

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a random 32-byte hex share token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Give a list a fresh share token, revoking any previous one.
///
/// # Errors
///
/// Returns `NotFound` for an unknown list.
pub async fn regenerate_token(store: &dyn Store, list_id: Uuid) -> Result<String, PackError> {
    let list = store::get_list(store, list_id).await?;
    let revoked = list.share_token.is_some();

    let token = generate_token();
    let patch = ListPatch { share_token: Some(token.clone()), ..ListPatch::default() };
    store.commit(vec![Write::patch_list(list_id, patch)]).await?;

    info!(%list_id, revoked, "regenerated share token");
    Ok(token)
}

// =============================================================================
// SHARED VIEW
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedItem {
    pub position: usize,
    pub name: String,
    pub category: Category,
    pub kind: ItemKind,
    pub weight_grams: i32,
    pub quantity: i32,
    pub display_weight: String,
}

/// Read-only projection of a shared list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedView {
    pub title: String,
    pub description: String,
    pub unit: Unit,
    pub items: Vec<SharedItem>,
    pub categories: Vec<CategoryTotal>,
    pub summary: Summary,
    pub display: DisplaySummary,
}

impl From<ListDetail> for SharedView {
    fn from(detail: ListDetail) -> Self {
        let unit = detail.list.unit;
        let items = detail
            .items
            .into_iter()
            .enumerate()
            .map(|(position, item)| SharedItem {
                position,
                display_weight: to_display(i64::from(item.weight_grams), unit),
                name: item.name,
                category: item.category,
                kind: item.kind,
                weight_grams: item.weight_grams,
                quantity: item.quantity,
            })
            .collect();
        Self {
            title: detail.list.title,
            description: detail.list.description,
            unit,
            items,
            categories: detail.categories,
            summary: detail.summary,
            display: detail.display,
        }
    }
}

/// Resolve a share token to the live view of its list.
///
/// # Errors
///
/// Returns `NotFound` for an empty, unknown or superseded token.
pub async fn get_shared_view(store: &dyn Store, token: &str) -> Result<SharedView, PackError> {
    let not_found = || PackError::NotFound { entity: "share token", id: token.to_owned() };
    if token.trim().is_empty() {
        return Err(not_found());
    }
    let list = store::list_by_token(store, token).await?.ok_or_else(not_found)?;
    let items = store::items_of(store, Owner::List(list.id)).await?;
    Ok(ListDetail::build(list, items).into())
}

#[cfg(test)]
#[path = "share_test.rs"]
mod tests;
