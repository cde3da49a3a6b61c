//! Service Configuration
//!
//! Defaults overridable by an optional `habitwatch.toml` next to the
//! working directory and by `HABITWATCH_*` environment variables.

use serde::{Deserialize, Serialize};

/// Deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Observation table file
    pub data_path: String,
    /// Directory holding model artifacts
    pub model_dir: String,
    /// Subject this deployment records (one user per deployment)
    pub subject_id: i64,
    /// Probability above which the narrative calls a risk out
    pub elevated_threshold: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_path: "data/observations.csv".to_string(),
            model_dir: "models".to_string(),
            subject_id: 1,
            elevated_threshold: 0.30,
        }
    }
}

impl ServiceConfig {
    /// Layer defaults, the optional config file, and environment overrides
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let defaults = Self::default();
        ::config::Config::builder()
            .set_default("data_path", defaults.data_path)?
            .set_default("model_dir", defaults.model_dir)?
            .set_default("subject_id", defaults.subject_id)?
            .set_default("elevated_threshold", defaults.elevated_threshold)?
            .add_source(::config::File::with_name("habitwatch").required(false))
            .add_source(::config::Environment::with_prefix("HABITWATCH"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let config = ServiceConfig::load().unwrap();
        assert_eq!(config.subject_id, 1);
        assert!(config.data_path.ends_with("observations.csv"));
    }
}
