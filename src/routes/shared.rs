//! Public read-only view of a shared list.

use axum::extract::{Path, State};

use super::{ApiResult, data};
use crate::services::share::{self, SharedView};
use crate::state::AppState;

/// `GET /api/v1/shared/:token` — live projection of the list holding `token`.
pub async fn shared_view(State(state): State<AppState>, Path(token): Path<String>) -> ApiResult<SharedView> {
    Ok(data(share::get_shared_view(state.store(), &token).await?))
}
