//! Feature Engineering Engine
//!
//! Turns raw observation rows into the exact numeric schemas the trained
//! risk classifiers expect: two per-observation layouts for same-day
//! estimates and one longitudinal summary layout for ten-year projections.

mod layout;
mod longitudinal;
mod single;
mod stats;
mod vector;

pub use layout::{feature_label, LayoutKind};
pub use longitudinal::aggregate;
pub use single::build;
pub use vector::{Disease, FeatureVector};

// missing-value semantics travel with the vectors they annotate
pub use record_store::{is_missing, SENTINEL};
