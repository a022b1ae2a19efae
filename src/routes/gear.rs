//! Gear catalog routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiError, ApiJson, ApiResult, DataResponse, data};
use crate::model::{GearItem, ItemDraft, Owner};
use crate::services::catalog::{self, GearListItem};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TransferBody {
    /// Target list; `null` moves the item back to the catalog.
    #[serde(default)]
    pub list_id: Option<Uuid>,
}

/// `GET /api/v1/gear-items` — every item with its owning list title.
pub async fn list_gear(State(state): State<AppState>) -> ApiResult<Vec<GearListItem>> {
    Ok(data(catalog::list_catalog_items(state.store()).await?))
}

/// `POST /api/v1/gear-items` — register a catalog item.
pub async fn create_gear(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ItemDraft>,
) -> Result<(StatusCode, Json<DataResponse<GearItem>>), ApiError> {
    let item = catalog::create_catalog_item(state.store(), &draft).await?;
    Ok((StatusCode::CREATED, data(item)))
}

/// `DELETE /api/v1/gear-items/:id` — delete an item wherever it lives.
pub async fn delete_gear(State(state): State<AppState>, Path(item_id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    catalog::delete_catalog_item(state.store(), item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/v1/gear-items/:id/transfer` — move an item to a list or back.
pub async fn transfer_gear(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    ApiJson(body): ApiJson<TransferBody>,
) -> ApiResult<GearItem> {
    let target = Owner::from_list_id(body.list_id);
    Ok(data(catalog::transfer_item(state.store(), item_id, target).await?))
}

#[cfg(test)]
#[path = "gear_test.rs"]
mod tests;
