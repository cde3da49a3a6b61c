//! Habit Risk Service
//!
//! Synchronous orchestration over the pipeline: record an observation and
//! estimate today's risks, or project ten-year risks from the whole
//! recorded history. One request, one pass through
//! store → features → models → narrative; no background work.

mod config;
mod service;

pub use self::config::ServiceConfig;
pub use self::service::{
    DiseaseRisk, HealthService, OutlookReport, SameDayOutcome, SameDayReport, ServiceError,
};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    // a second init (e.g. in tests) keeps the first subscriber
    let _ = tracing::subscriber::set_global_default(subscriber);
}
