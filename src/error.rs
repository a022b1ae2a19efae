//! Typed errors raised by the packing-list core.
//!
//! DESIGN
//! ======
//! Every core operation returns `PackError`. Route handlers translate the
//! variants into HTTP status codes and the `{"error": {...}}` envelope; the
//! core itself carries no user-facing text beyond the variant message.

use uuid::Uuid;

use crate::store::StoreError;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// PACK ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl PackError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn item_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "item", id: id.to_string() }
    }
}

impl From<StoreError> for PackError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                Self::NotFound { entity: collection.entity_name(), id: id.to_string() }
            }
            StoreError::Conflict(message) => Self::Conflict(message),
            other => Self::Store(other),
        }
    }
}

impl ErrorCode for PackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Conflict(_) => "E_CONFLICT",
            Self::Store(_) => "E_STORE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
