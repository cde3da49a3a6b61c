//! Model Registry
//!
//! Process-wide cache of model handles keyed by (disease, horizon), so
//! repeated inference calls don't re-read artifact files. Population is
//! lazy through a pluggable loader; `invalidate` drops a handle so the next
//! lookup reloads it.

use crate::model::{LinearModel, Prediction, RiskModel};
use crate::{guard_layout, InferenceError};
use feature_engine::{Disease, FeatureVector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

/// Prediction horizon a model was trained for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    /// Same-day estimate from one observation
    SameDay,
    /// Ten-year projection from the whole history
    TenYear,
}

impl Horizon {
    /// Artifact file prefix
    pub fn code(&self) -> &'static str {
        match self {
            Horizon::SameDay => "base",
            Horizon::TenYear => "follow",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Horizon::SameDay => "same-day",
            Horizon::TenYear => "ten-year",
        }
    }
}

/// Resolves a (disease, horizon) pair to a loaded model handle
pub type ModelLoader =
    Box<dyn Fn(Disease, Horizon) -> Result<Arc<dyn RiskModel>, InferenceError> + Send + Sync>;

/// Directory-backed loader for JSON artifacts.
///
/// Same-day lookups fall back from the `base_` prefix to the `current_`
/// prefix, matching how the artifacts have historically been named.
pub fn default_loader(model_dir: PathBuf) -> ModelLoader {
    Box::new(move |disease, horizon| {
        let mut candidates = vec![format!("{}_model_{}.json", horizon.code(), disease.code())];
        if horizon == Horizon::SameDay {
            candidates.push(format!("current_model_{}.json", disease.code()));
        }

        for name in &candidates {
            let path = model_dir.join(name);
            if path.exists() {
                let model = LinearModel::from_path(&path)?;
                info!(artifact = %path.display(), "loaded model");
                return Ok(Arc::new(model) as Arc<dyn RiskModel>);
            }
        }

        Err(InferenceError::ModelUnavailable {
            disease: disease.name(),
            horizon: horizon.name(),
            reason: format!(
                "none of {candidates:?} found in {}",
                model_dir.display()
            ),
        })
    })
}

/// Lazily-populated registry of model handles
pub struct ModelRegistry {
    loader: ModelLoader,
    cache: Mutex<HashMap<(Disease, Horizon), Arc<dyn RiskModel>>>,
}

impl ModelRegistry {
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            loader,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Registry over JSON artifacts in `model_dir`
    pub fn with_model_dir(model_dir: PathBuf) -> Self {
        Self::new(default_loader(model_dir))
    }

    fn lock_cache(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<(Disease, Horizon), Arc<dyn RiskModel>>>, InferenceError>
    {
        self.cache
            .lock()
            .map_err(|e| InferenceError::InferenceFailed(format!("lock error: {e}")))
    }

    /// Cached handle for the pair, loading it on first use
    pub fn get(
        &self,
        disease: Disease,
        horizon: Horizon,
    ) -> Result<Arc<dyn RiskModel>, InferenceError> {
        if let Some(model) = self.lock_cache()?.get(&(disease, horizon)) {
            return Ok(Arc::clone(model));
        }

        let model = (self.loader)(disease, horizon)?;
        self.lock_cache()?
            .insert((disease, horizon), Arc::clone(&model));
        Ok(model)
    }

    /// Pre-register a handle (tests, explicit fallbacks)
    pub fn register(
        &self,
        disease: Disease,
        horizon: Horizon,
        model: Arc<dyn RiskModel>,
    ) -> Result<(), InferenceError> {
        self.lock_cache()?.insert((disease, horizon), model);
        Ok(())
    }

    /// Drop one cached handle so the next lookup reloads it
    pub fn invalidate(&self, disease: Disease, horizon: Horizon) -> Result<(), InferenceError> {
        self.lock_cache()?.remove(&(disease, horizon));
        Ok(())
    }

    /// Drop every cached handle
    pub fn invalidate_all(&self) -> Result<(), InferenceError> {
        self.lock_cache()?.clear();
        Ok(())
    }

    /// Load (or reuse) the model and score one vector
    pub fn predict(
        &self,
        disease: Disease,
        horizon: Horizon,
        features: &FeatureVector,
    ) -> Result<Prediction, InferenceError> {
        let model = self.get(disease, horizon)?;
        guard_layout(model.expected_layout(), features)?;

        let start = Instant::now();
        let prediction = model.predict(features)?;
        debug!(
            disease = disease.name(),
            horizon = horizon.name(),
            probability = prediction.probability,
            latency_us = start.elapsed().as_micros() as u64,
            "inference completed"
        );
        Ok(prediction)
    }
}
