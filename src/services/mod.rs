//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the packing-list rules and talk to storage only
//! through the `Store` trait, so route handlers stay focused on protocol
//! translation. Aggregates (`summary`) and unit rendering (`units`) are pure
//! functions; every other module validates, then commits one atomic batch.

pub mod catalog;
pub mod ordering;
pub mod packing_list;
pub mod sample_data;
pub mod share;
pub mod summary;
pub mod units;
