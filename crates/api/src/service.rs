//! Orchestration Service
//!
//! Wires the pipeline end to end. Each call is one synchronous pass: read
//! the table, derive one feature vector, run the models, and in the
//! ten-year case hand the results to the advisor for narrative text. A
//! missing model degrades that disease's slot; it never blocks the others.

use crate::config::ServiceConfig;
use advisor::{Advisor, AdvisorConfig};
use feature_engine::{aggregate, build, Disease};
use inference_engine::{Horizon, InferenceError, ModelRegistry, Prediction};
use record_store::{Observation, ObservationDraft, RecordStore, StoreError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Errors surfaced to the caller of the service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Per-disease result of a same-day estimate
#[derive(Debug, Serialize)]
pub struct SameDayOutcome {
    pub disease: Disease,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<String>,
}

/// Result of recording one observation and estimating today's risks
#[derive(Debug, Serialize)]
pub struct SameDayReport {
    /// The row as stored (optionals resolved to the sentinel)
    pub observation: Observation,
    pub outcomes: Vec<SameDayOutcome>,
    /// The subject's most recent rows, newest first
    pub recent: Vec<Observation>,
}

/// One disease's ten-year projection
#[derive(Debug, Serialize)]
pub struct DiseaseRisk {
    pub disease: Disease,
    pub probability: f64,
    pub positive: bool,
    pub top_features: Vec<(String, f64)>,
}

/// Full ten-year outlook for one subject
#[derive(Debug, Serialize)]
pub struct OutlookReport {
    pub subject_id: i64,
    /// Number of observations the projection is based on
    pub observations: usize,
    pub risks: Vec<DiseaseRisk>,
    /// Diseases whose model could not be used, with the reason
    pub unavailable: Vec<(Disease, String)>,
    pub narrative: String,
}

/// The assembled pipeline
pub struct HealthService {
    store: RecordStore,
    registry: ModelRegistry,
    advisor: Advisor,
}

impl HealthService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let store = RecordStore::open(config.data_path.as_str())?;
        let registry = ModelRegistry::with_model_dir(PathBuf::from(config.model_dir.as_str()));
        let advisor = Advisor::new(AdvisorConfig {
            elevated_threshold: config.elevated_threshold,
        });

        info!(
            data = %config.data_path,
            models = %config.model_dir,
            "health service ready"
        );
        Ok(Self {
            store,
            registry,
            advisor,
        })
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Drop cached model handles so newly deployed artifacts are picked up
    pub fn reload_models(&self) -> Result<(), ServiceError> {
        self.registry.invalidate_all()?;
        Ok(())
    }

    /// Store one observation and estimate today's risk per disease.
    ///
    /// The store keeps accumulating even when no models are deployed; each
    /// disease's slot then carries the reason instead of an estimate.
    pub fn submit_observation(
        &self,
        draft: ObservationDraft,
    ) -> Result<SameDayReport, ServiceError> {
        let subject_id = draft.subject_id;
        self.store.append(draft)?;

        let rows = self.store.load_subject(subject_id)?;
        let latest = rows.last().cloned().unwrap_or_default();

        let mut outcomes = Vec::new();
        for disease in Disease::ALL {
            let features = build(&latest, disease);
            match self.registry.predict(disease, Horizon::SameDay, &features) {
                Ok(prediction) => outcomes.push(SameDayOutcome {
                    disease,
                    estimate: Some(prediction),
                    unavailable: None,
                }),
                // a wrongly-shaped vector is a bug, not a degraded mode
                Err(err @ InferenceError::SchemaMismatch { .. }) => return Err(err.into()),
                Err(err) => {
                    warn!(disease = disease.name(), error = %err, "same-day model unavailable");
                    outcomes.push(SameDayOutcome {
                        disease,
                        estimate: None,
                        unavailable: Some(err.to_string()),
                    });
                }
            }
        }

        let recent = rows.iter().rev().take(5).cloned().collect();
        Ok(SameDayReport {
            observation: latest,
            outcomes,
            recent,
        })
    }

    /// Project ten-year risks from the subject's whole history
    pub fn ten_year_outlook(&self, subject_id: i64) -> Result<OutlookReport, ServiceError> {
        let rows = self.store.load_subject(subject_id)?;
        let features = aggregate(&rows);

        let mut risks = Vec::new();
        let mut unavailable = Vec::new();
        for disease in Disease::ALL {
            match self.registry.predict(disease, Horizon::TenYear, &features) {
                Ok(prediction) => risks.push(DiseaseRisk {
                    disease,
                    probability: prediction.probability,
                    positive: prediction.positive,
                    top_features: prediction.top_features(3),
                }),
                Err(err @ InferenceError::SchemaMismatch { .. }) => return Err(err.into()),
                Err(err) => {
                    warn!(disease = disease.name(), error = %err, "ten-year model unavailable");
                    unavailable.push((disease, err.to_string()));
                }
            }
        }

        let probabilities: Vec<(Disease, f64)> = risks
            .iter()
            .map(|risk| (risk.disease, risk.probability))
            .collect();
        let importances: Vec<(Disease, Vec<(String, f64)>)> = risks
            .iter()
            .map(|risk| (risk.disease, risk.top_features.clone()))
            .collect();
        let narrative = self.advisor.explain(&features, &probabilities, &importances);

        Ok(OutlookReport {
            subject_id,
            observations: rows.len(),
            risks,
            unavailable,
            narrative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use inference_engine::HeuristicModel;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> ServiceConfig {
        ServiceConfig {
            data_path: dir
                .path()
                .join("observations.csv")
                .to_string_lossy()
                .into_owned(),
            model_dir: dir.path().join("models").to_string_lossy().into_owned(),
            subject_id: 1,
            elevated_threshold: 0.30,
        }
    }

    fn draft(day: u32) -> ObservationDraft {
        ObservationDraft {
            subject_id: 1,
            exam_date: NaiveDate::from_ymd_opt(2025, 6, day),
            parity: 0,
            sex: 1,
            education: 4,
            age: 45,
            drink_flag: 1,
            smoke_flag: 0,
            hypertension: 0,
            diabetes: 0,
            dyslipidemia: 0,
            weight_kg: 70.0,
            height_cm: 175.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_submission_works_without_any_models() {
        let dir = TempDir::new().unwrap();
        let service = HealthService::new(&test_config(&dir)).unwrap();

        let report = service.submit_observation(draft(1)).unwrap();
        assert_eq!(report.outcomes.len(), 3);
        assert!(report.outcomes.iter().all(|o| o.estimate.is_none()));
        assert!(report.outcomes.iter().all(|o| o.unavailable.is_some()));
        assert_eq!(report.recent.len(), 1);

        // the row was stored regardless
        assert_eq!(service.store().load_subject(1).unwrap().len(), 1);
    }

    #[test]
    fn test_one_missing_model_does_not_block_the_others() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::create_dir_all(&config.model_dir).unwrap();
        std::fs::write(
            std::path::Path::new(&config.model_dir).join("follow_model_htn.json"),
            r#"{
                "layout": "Followup",
                "intercept": -1.0,
                "coefficients": { "bmi_mean": 0.05, "systolic_bp_mean": 0.01 }
            }"#,
        )
        .unwrap();

        let service = HealthService::new(&config).unwrap();
        service.submit_observation(draft(1)).unwrap();
        service.submit_observation(draft(2)).unwrap();

        let report = service.ten_year_outlook(1).unwrap();
        assert_eq!(report.observations, 2);
        assert_eq!(report.risks.len(), 1);
        assert_eq!(report.risks[0].disease, Disease::Hypertension);
        assert_eq!(report.unavailable.len(), 2);
        assert!(report.narrative.contains("hypertension"));
    }

    #[test]
    fn test_wide_layout_reaches_the_diabetes_model() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::create_dir_all(&config.model_dir).unwrap();
        std::fs::write(
            std::path::Path::new(&config.model_dir).join("base_model_dm.json"),
            r#"{
                "layout": "Wide",
                "intercept": -2.0,
                "coefficients": { "fasting_glucose": 0.02, "sex_male": 0.1 }
            }"#,
        )
        .unwrap();

        let service = HealthService::new(&config).unwrap();
        let report = service.submit_observation(draft(1)).unwrap();

        let diabetes = report
            .outcomes
            .iter()
            .find(|o| o.disease == Disease::Diabetes)
            .unwrap();
        assert!(diabetes.estimate.is_some());
    }

    #[test]
    fn test_registered_fallback_models_cover_all_diseases() {
        let dir = TempDir::new().unwrap();
        let service = HealthService::new(&test_config(&dir)).unwrap();

        for disease in Disease::ALL {
            service
                .registry()
                .register(
                    disease,
                    Horizon::TenYear,
                    Arc::new(HeuristicModel::new(
                        disease,
                        feature_engine::LayoutKind::Followup,
                    )),
                )
                .unwrap();
        }

        service.submit_observation(draft(1)).unwrap();
        let report = service.ten_year_outlook(1).unwrap();
        assert_eq!(report.risks.len(), 3);
        assert!(report.unavailable.is_empty());
        assert!(!report.narrative.is_empty());

        // dropping the cached handles goes back to the (empty) model dir
        service.reload_models().unwrap();
        let report = service.ten_year_outlook(1).unwrap();
        assert_eq!(report.unavailable.len(), 3);
    }

    #[test]
    fn test_unknown_subject_is_reported() {
        let dir = TempDir::new().unwrap();
        let service = HealthService::new(&test_config(&dir)).unwrap();

        assert!(matches!(
            service.ten_year_outlook(42),
            Err(ServiceError::Store(StoreError::SubjectNotFound(42)))
        ));
    }
}
