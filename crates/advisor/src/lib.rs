//! Risk Narrative Generation
//!
//! Turns the aggregated features, per-disease probabilities and feature
//! importances into plain text for the subject. This collaborator never
//! fails: whatever goes missing, some readable summary comes back.

mod narrative;

pub use narrative::{Advisor, AdvisorConfig};
