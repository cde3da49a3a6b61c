//! Risk Models
//!
//! Two implementations of the adapter contract: a linear scorer loaded from
//! a JSON artifact (the deployed classifiers), and a deterministic
//! threshold model used in tests and as an explicit fallback registration.

use crate::{guard_layout, InferenceError};
use feature_engine::{is_missing, Disease, FeatureVector, LayoutKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of one inference call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Positive-class probability
    pub probability: f64,
    /// Predicted label (true = likely to develop the condition)
    pub positive: bool,
    /// Per-feature importance scores, unordered; may be empty
    pub importances: Vec<(String, f64)>,
}

impl Prediction {
    /// The `n` most important features, highest first
    pub fn top_features(&self, n: usize) -> Vec<(String, f64)> {
        let mut ranked = self.importances.clone();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// A trained classifier behind the adapter boundary
pub trait RiskModel: Send + Sync {
    /// Layout this model was trained on
    fn expected_layout(&self) -> LayoutKind;

    /// Score one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError>;
}

/// Logistic scorer deserialized from a JSON artifact.
///
/// The artifact names its training layout, an intercept, a decision
/// threshold and one coefficient per feature column. Coefficient names are
/// checked against the layout at load time so a stale artifact fails loudly
/// instead of silently scoring the wrong columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    layout: LayoutKind,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
    coefficients: BTreeMap<String, f64>,
}

fn default_threshold() -> f64 {
    0.5
}

impl LinearModel {
    /// Read and validate an artifact file
    pub fn from_path(path: &Path) -> Result<Self, InferenceError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| InferenceError::InvalidModel(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Parse and validate an artifact from JSON text
    pub fn from_json(text: &str) -> Result<Self, InferenceError> {
        let model: LinearModel = serde_json::from_str(text)
            .map_err(|e| InferenceError::InvalidModel(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), InferenceError> {
        let columns = self.layout.column_names();
        for name in self.coefficients.keys() {
            if !columns.contains(&name.as_str()) {
                return Err(InferenceError::InvalidModel(format!(
                    "coefficient {name:?} is not a column of the {:?} layout",
                    self.layout
                )));
            }
        }
        Ok(())
    }
}

impl RiskModel for LinearModel {
    fn expected_layout(&self) -> LayoutKind {
        self.layout
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        guard_layout(self.layout, features)?;

        let mut z = self.intercept;
        for (name, coefficient) in &self.coefficients {
            match features.get(name) {
                // undefined statistics contribute nothing; sentinel codes
                // pass through as trained
                Some(value) if !value.is_nan() => z += coefficient * value,
                _ => {}
            }
        }
        let probability = 1.0 / (1.0 + (-z).exp());

        let importances = self
            .coefficients
            .iter()
            .map(|(name, coefficient)| (name.clone(), coefficient.abs()))
            .collect();

        Ok(Prediction {
            probability,
            positive: probability >= self.threshold,
            importances,
        })
    }
}

/// Deterministic clinical-threshold model.
///
/// Stands in when no artifact is deployed; also keeps the tests
/// independent of files on disk.
pub struct HeuristicModel {
    disease: Disease,
    layout: LayoutKind,
}

impl HeuristicModel {
    pub fn new(disease: Disease, layout: LayoutKind) -> Self {
        Self { disease, layout }
    }

    /// Signals are named per layout: the followup schema suffixes means
    fn signal(&self, features: &FeatureVector, name: &str) -> Option<f64> {
        features
            .get(name)
            .or_else(|| features.get(&format!("{name}_mean")))
            .filter(|v| !is_missing(*v))
    }
}

impl RiskModel for HeuristicModel {
    fn expected_layout(&self) -> LayoutKind {
        self.layout
    }

    fn predict(&self, features: &FeatureVector) -> Result<Prediction, InferenceError> {
        guard_layout(self.layout, features)?;

        let mut risk: f64 = 0.08;
        let mut importances: Vec<(String, f64)> = Vec::new();
        let mut bump = |name: &str, amount: f64, risk: &mut f64| {
            *risk += amount;
            importances.push((name.to_string(), amount));
        };

        match self.disease {
            Disease::Hypertension => {
                if let Some(sbp) = self.signal(features, "systolic_bp") {
                    if sbp >= 140.0 {
                        bump("systolic_bp", 0.5, &mut risk);
                    } else if sbp >= 130.0 {
                        bump("systolic_bp", 0.25, &mut risk);
                    }
                }
                if let Some(bmi) = self.signal(features, "bmi") {
                    if bmi >= 30.0 {
                        bump("bmi", 0.15, &mut risk);
                    }
                }
                for parent in ["mother_htn", "father_htn"] {
                    if self.signal(features, parent) == Some(1.0) {
                        bump(parent, 0.1, &mut risk);
                    }
                }
            }
            Disease::Diabetes => {
                if let Some(glucose) = self.signal(features, "fasting_glucose") {
                    if glucose >= 126.0 {
                        bump("fasting_glucose", 0.5, &mut risk);
                    } else if glucose >= 100.0 {
                        bump("fasting_glucose", 0.25, &mut risk);
                    }
                }
                if let Some(hba1c) = self.signal(features, "hba1c") {
                    if hba1c >= 6.5 {
                        bump("hba1c", 0.3, &mut risk);
                    }
                }
                for parent in ["mother_dm", "father_dm"] {
                    if self.signal(features, parent) == Some(1.0) {
                        bump(parent, 0.1, &mut risk);
                    }
                }
            }
            Disease::Dyslipidemia => {
                if let Some(tchl) = self.signal(features, "total_cholesterol") {
                    if tchl >= 240.0 {
                        bump("total_cholesterol", 0.5, &mut risk);
                    } else if tchl >= 200.0 {
                        bump("total_cholesterol", 0.25, &mut risk);
                    }
                }
                if let Some(hdl) = self.signal(features, "hdl") {
                    if hdl < 40.0 {
                        bump("hdl", 0.15, &mut risk);
                    }
                }
                if let Some(tg) = self.signal(features, "triglycerides") {
                    if tg >= 200.0 {
                        bump("triglycerides", 0.15, &mut risk);
                    }
                }
            }
        }

        let probability = risk.clamp(0.01, 0.95);
        Ok(Prediction {
            probability,
            positive: probability >= 0.5,
            importances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{aggregate, build};
    use record_store::{Observation, ObservationDraft};

    fn observation() -> Observation {
        ObservationDraft {
            subject_id: 1,
            parity: 0,
            sex: 1,
            education: 4,
            age: 45,
            drink_flag: 0,
            smoke_flag: 0,
            hypertension: 0,
            diabetes: 0,
            dyslipidemia: 0,
            weight_kg: 70.0,
            height_cm: 175.0,
            systolic_bp: Some(150.0),
            ..Default::default()
        }
        .into_observation()
    }

    #[test]
    fn test_heuristic_flags_elevated_pressure() {
        let model = HeuristicModel::new(Disease::Hypertension, LayoutKind::Compact);
        let features = build(&observation(), Disease::Hypertension);

        let prediction = model.predict(&features).unwrap();
        assert!(prediction.probability > 0.5);
        assert!(prediction.positive);
        assert_eq!(prediction.top_features(1)[0].0, "systolic_bp");
    }

    #[test]
    fn test_heuristic_reads_followup_means() {
        let model = HeuristicModel::new(Disease::Hypertension, LayoutKind::Followup);
        let features = aggregate(&[observation()]);

        let prediction = model.predict(&features).unwrap();
        assert!(prediction.probability > 0.5);
    }

    #[test]
    fn test_schema_mismatch_fails_loudly() {
        let model = HeuristicModel::new(Disease::Hypertension, LayoutKind::Followup);
        let features = build(&observation(), Disease::Hypertension);

        assert!(matches!(
            model.predict(&features),
            Err(InferenceError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_linear_model_round_trip() {
        let artifact = r#"{
            "layout": "Compact",
            "intercept": -2.0,
            "threshold": 0.5,
            "coefficients": { "bmi": 0.1, "systolic_bp": 0.01 }
        }"#;
        let model = LinearModel::from_json(artifact).unwrap();
        assert_eq!(model.expected_layout(), LayoutKind::Compact);

        let features = build(&observation(), Disease::Hypertension);
        let prediction = model.predict(&features).unwrap();
        assert!(prediction.probability > 0.0 && prediction.probability < 1.0);
        assert_eq!(prediction.top_features(1)[0].0, "bmi");
    }

    #[test]
    fn test_linear_model_rejects_foreign_coefficients() {
        let artifact = r#"{
            "layout": "Compact",
            "intercept": 0.0,
            "coefficients": { "no_such_column": 1.0 }
        }"#;
        assert!(matches!(
            LinearModel::from_json(artifact),
            Err(InferenceError::InvalidModel(_))
        ));
    }
}
