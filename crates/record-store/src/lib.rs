//! Observation Record Store
//!
//! Append-only CSV-backed table of health-habit observations, one row per
//! survey entry, with a fixed column schema and a `-1` missing-value sentinel.

mod error;
mod schema;
mod store;

pub use error::{StoreError, ValidationError};
pub use schema::{
    is_missing, Observation, ObservationDraft, COLUMNS, SENTINEL,
};
pub use store::RecordStore;
