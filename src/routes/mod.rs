//! Router assembly and the JSON envelope.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every API route lives under `/api/v1`. Successful responses are wrapped
//! as `{"data": ...}`; failures become `{"error": {"code", "message"}}` with
//! the status chosen from the `PackError` variant, including bodies the
//! `ApiJson` extractor cannot decode. Handlers stay thin: parse the body,
//! call one service, wrap the result.

pub mod gear;
pub mod lists;
pub mod shared;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, patch, post, put};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::{ErrorCode, PackError};
use crate::state::AppState;

// =============================================================================
// ENVELOPE
// =============================================================================

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

pub(crate) fn data<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse { data })
}

pub type ApiResult<T> = Result<Json<DataResponse<T>>, ApiError>;

/// A `PackError` on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub PackError);

impl From<PackError> for ApiError {
    fn from(err: PackError) -> Self {
        Self(err)
    }
}

/// Unreadable bodies (bad JSON, missing or mistyped fields, wrong content
/// type) are validation failures like any other.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PackError::validation(format!("invalid request body: {}", rejection.body_text())))
    }
}

/// `Json` body extractor that rejects through `ApiError`, so a body axum
/// cannot decode still gets the error envelope.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl ApiError {
    /// Status and wire code for the wrapped error.
    #[must_use]
    pub fn status(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            PackError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            PackError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            PackError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            PackError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let message = match &self.0 {
            PackError::Store(err) => {
                error!(error = %err, code = self.0.error_code(), "store failure");
                "an internal error occurred".to_owned()
            }
            PackError::Conflict(msg) => {
                warn!(%msg, code = self.0.error_code(), retryable = self.0.retryable(), "write rejected by store");
                self.0.to_string()
            }
            other => other.to_string(),
        };

        let body = json!({ "error": { "code": code, "message": message } });
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// CORS for the configured origins. A literal `*` opens the API to any
/// origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parse_origins(allowed_origins))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

fn parse_origins(allowed_origins: &[String]) -> Vec<HeaderValue> {
    allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect()
}

/// Build the full application router.
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/v1/lists", get(lists::list_lists).post(lists::create_list))
        .route(
            "/api/v1/lists/{id}",
            get(lists::get_list)
                .patch(lists::update_list)
                .delete(lists::delete_list),
        )
        .route("/api/v1/lists/{id}/unit", patch(lists::set_unit))
        .route("/api/v1/lists/{id}/items", post(lists::add_item))
        .route(
            "/api/v1/lists/{id}/items/{item_id}",
            patch(lists::update_item).delete(lists::remove_item),
        )
        .route("/api/v1/lists/{id}/items/{item_id}/packed", patch(lists::set_packed))
        .route("/api/v1/lists/{id}/order", put(lists::reorder))
        .route("/api/v1/lists/{id}/share/regenerate", post(lists::regenerate_share))
        .route("/api/v1/shared/{token}", get(shared::shared_view))
        .route("/api/v1/gear-items", get(gear::list_gear).post(gear::create_gear))
        .route("/api/v1/gear-items/{id}", delete(gear::delete_gear))
        .route("/api/v1/gear-items/{id}/transfer", post(gear::transfer_gear))
        .route("/healthz", get(healthz))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "test_support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
