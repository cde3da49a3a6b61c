//! Habit Risk Pipeline - Main Entry Point
//!
//! Loads the configured subject's history and prints the ten-year outlook
//! report as JSON. Recording observations is driven by the collection
//! surface through the service API; this binary is the reporting entry.

use anyhow::Context;
use api::{init_logging, HealthService, ServiceConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== HabitWatch risk pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::load().context("loading configuration")?;
    let service = HealthService::new(&config).context("starting service")?;

    let report = service
        .ten_year_outlook(config.subject_id)
        .with_context(|| format!("projecting risks for subject {}", config.subject_id))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
