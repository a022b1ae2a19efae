//! Packing list routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, ApiJson, ApiResult, DataResponse, data};
use crate::model::{ItemDraft, ListDraft, PackingList};
use crate::services::packing_list::{self, ListDetail};
use crate::services::{ordering, share, units};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateListBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct UnitBody {
    pub unit: String,
}

#[derive(Deserialize)]
pub struct PackedBody {
    pub packed: bool,
}

#[derive(Deserialize)]
pub struct OrderBody {
    pub item_ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct ShareTokenResponse {
    pub share_token: String,
}

/// `GET /api/v1/lists` — all lists, newest first.
pub async fn list_lists(State(state): State<AppState>) -> ApiResult<Vec<PackingList>> {
    Ok(data(packing_list::list_lists(state.store()).await?))
}

/// `POST /api/v1/lists` — create a list, optionally from a template.
pub async fn create_list(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateListBody>,
) -> Result<(StatusCode, Json<DataResponse<ListDetail>>), ApiError> {
    let draft = ListDraft { title: body.title, description: body.description };
    let detail = packing_list::create_list(state.store(), &draft, body.template_id).await?;
    Ok((StatusCode::CREATED, data(detail)))
}

/// `GET /api/v1/lists/:id` — list detail with summary.
pub async fn get_list(State(state): State<AppState>, Path(list_id): Path<Uuid>) -> ApiResult<ListDetail> {
    Ok(data(packing_list::get_list(state.store(), list_id).await?))
}

/// `PATCH /api/v1/lists/:id` — replace title and description.
pub async fn update_list(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    ApiJson(draft): ApiJson<ListDraft>,
) -> ApiResult<ListDetail> {
    Ok(data(packing_list::update_list_meta(state.store(), list_id, &draft).await?))
}

/// `DELETE /api/v1/lists/:id` — delete a list and its items.
pub async fn delete_list(State(state): State<AppState>, Path(list_id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    packing_list::delete_list(state.store(), list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/v1/lists/:id/unit` — set the display unit.
pub async fn set_unit(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    ApiJson(body): ApiJson<UnitBody>,
) -> ApiResult<ListDetail> {
    let unit = units::parse_unit(&body.unit)?;
    Ok(data(packing_list::set_unit(state.store(), list_id, unit).await?))
}

/// `POST /api/v1/lists/:id/items` — add an item at the end.
pub async fn add_item(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    ApiJson(draft): ApiJson<ItemDraft>,
) -> Result<(StatusCode, Json<DataResponse<ListDetail>>), ApiError> {
    let detail = packing_list::add_item(state.store(), list_id, &draft).await?;
    Ok((StatusCode::CREATED, data(detail)))
}

/// `PATCH /api/v1/lists/:id/items/:item_id` — replace an item's fields.
pub async fn update_item(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(Uuid, Uuid)>,
    ApiJson(draft): ApiJson<ItemDraft>,
) -> ApiResult<ListDetail> {
    Ok(data(packing_list::update_item(state.store(), list_id, item_id, &draft).await?))
}

/// `DELETE /api/v1/lists/:id/items/:item_id` — remove an item.
pub async fn remove_item(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<ListDetail> {
    Ok(data(packing_list::remove_item(state.store(), list_id, item_id).await?))
}

/// `PATCH /api/v1/lists/:id/items/:item_id/packed` — toggle packed state.
pub async fn set_packed(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(Uuid, Uuid)>,
    ApiJson(body): ApiJson<PackedBody>,
) -> ApiResult<ListDetail> {
    Ok(data(packing_list::set_packed(state.store(), list_id, item_id, body.packed).await?))
}

/// `PUT /api/v1/lists/:id/order` — apply a full permutation of item ids.
pub async fn reorder(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    ApiJson(body): ApiJson<OrderBody>,
) -> ApiResult<ListDetail> {
    ordering::reorder(state.store(), list_id, &body.item_ids).await?;
    Ok(data(packing_list::get_list(state.store(), list_id).await?))
}

/// `POST /api/v1/lists/:id/share/regenerate` — mint a new share token.
pub async fn regenerate_share(
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> ApiResult<ShareTokenResponse> {
    let share_token = share::regenerate_token(state.store(), list_id).await?;
    Ok(data(ShareTokenResponse { share_token }))
}

#[cfg(test)]
#[path = "lists_test.rs"]
mod tests;
