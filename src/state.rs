//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the record store the core operations read and write through; which
//! engine backs it (memory or Postgres) is decided once at startup.

use std::sync::Arc;

use crate::store::Store;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the store is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Borrow the store as a trait object for the service functions.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
