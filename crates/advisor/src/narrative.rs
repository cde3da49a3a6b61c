//! Narrative Assembly

use feature_engine::{feature_label, is_missing, Disease, FeatureVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Narrative configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Probability above which a disease is called out (default: 0.30)
    pub elevated_threshold: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            elevated_threshold: 0.30,
        }
    }
}

/// Explanation collaborator for projection reports
pub struct Advisor {
    config: AdvisorConfig,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    /// Compose the narrative for one subject's ten-year outlook.
    ///
    /// Total function: an empty probability map or a vector full of missing
    /// values still produces a minimal readable summary.
    pub fn explain(
        &self,
        features: &FeatureVector,
        probabilities: &[(Disease, f64)],
        importances: &[(Disease, Vec<(String, f64)>)],
    ) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push("Projected ten-year risk:".to_string());
        if probabilities.is_empty() {
            lines.push("- no model results are available right now".to_string());
        }
        for (disease, probability) in probabilities {
            lines.push(format!(
                "- {}: {:.1}%",
                disease.name(),
                probability * 100.0
            ));
        }

        let elevated: Vec<String> = probabilities
            .iter()
            .filter(|(_, p)| *p > self.config.elevated_threshold)
            .map(|(d, p)| format!("{} ({:.1}%)", d.name(), p * 100.0))
            .collect();

        lines.push(String::new());
        if elevated.is_empty() {
            lines.push(
                "All projected risks are currently low. Keeping up your present habits \
                 is the best way to stay there."
                    .to_string(),
            );
        } else {
            lines.push(format!("Attention needed for: {}.", elevated.join(", ")));
            lines.push(
                "Regular checkups and habit changes can meaningfully lower these risks."
                    .to_string(),
            );
        }

        for (disease, ranked) in importances {
            let labels: Vec<&str> = ranked
                .iter()
                .map(|(name, _)| feature_label(name).unwrap_or(name.as_str()))
                .collect();
            if !labels.is_empty() {
                lines.push(format!(
                    "The {} projection is driven mostly by: {}.",
                    disease.name(),
                    labels.join("; ")
                ));
            }
        }

        if let Some(bmi) = features.get("bmi_mean").filter(|v| !is_missing(*v)) {
            lines.push(format!(
                "Your recorded body mass index has averaged {bmi:.1}."
            ));
        }

        lines.push(String::new());
        lines.push("General guidance:".to_string());
        lines.push("- keep regular exercise and a balanced diet".to_string());
        lines.push("- avoid smoking and limit alcohol".to_string());
        lines.push("- attend routine health screenings".to_string());

        debug!(
            diseases = probabilities.len(),
            elevated = elevated.len(),
            "composed outlook narrative"
        );
        lines.join("\n")
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(AdvisorConfig::default())
    }
}
