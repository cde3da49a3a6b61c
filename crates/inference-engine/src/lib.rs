//! Risk Model Inference
//!
//! Adapter boundary around the trained chronic-disease classifiers. The
//! feature layer owns producing the exact input schema; this crate owns
//! checking it, loading model artifacts, and caching the handles so
//! repeated predictions don't re-read files.

mod model;
mod registry;

pub use model::{HeuristicModel, LinearModel, Prediction, RiskModel};
pub use registry::{default_loader, Horizon, ModelLoader, ModelRegistry};

use feature_engine::LayoutKind;
use thiserror::Error;

/// Errors during model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// No usable model artifact for this disease and horizon
    #[error("no model available for {disease}/{horizon}: {reason}")]
    ModelUnavailable {
        disease: &'static str,
        horizon: &'static str,
        reason: String,
    },

    /// Artifact exists but cannot be used
    #[error("invalid model artifact: {0}")]
    InvalidModel(String),

    /// Feature vector does not follow the layout the model was trained on.
    /// This is a programming error, not a user-facing condition.
    #[error("feature schema mismatch: model expects {expected:?}, vector is {actual:?}")]
    SchemaMismatch {
        expected: LayoutKind,
        actual: LayoutKind,
    },

    /// Prediction failed after the model was loaded
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

/// Fail loudly unless the vector follows the model's training layout
pub(crate) fn guard_layout(
    expected: LayoutKind,
    features: &feature_engine::FeatureVector,
) -> Result<(), InferenceError> {
    if features.layout() != expected {
        return Err(InferenceError::SchemaMismatch {
            expected,
            actual: features.layout(),
        });
    }
    Ok(())
}
