//! Feature Vector and Target Diseases

use crate::layout::LayoutKind;
use serde::{Deserialize, Serialize};

/// Chronic conditions the classifiers score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disease {
    Hypertension,
    Diabetes,
    Dyslipidemia,
}

impl Disease {
    pub const ALL: [Disease; 3] = [
        Disease::Hypertension,
        Disease::Diabetes,
        Disease::Dyslipidemia,
    ];

    /// Short code used in model file names
    pub fn code(&self) -> &'static str {
        match self {
            Disease::Hypertension => "htn",
            Disease::Diabetes => "dm",
            Disease::Dyslipidemia => "lip",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Disease::Hypertension => "hypertension",
            Disease::Diabetes => "diabetes",
            Disease::Dyslipidemia => "dyslipidemia",
        }
    }

    /// Which same-day input layout this disease's classifier was trained on.
    ///
    /// The diabetes model came from a fully one-hot-expanded survey schema;
    /// the other two use the compact raw-measure schema.
    pub fn layout(&self) -> LayoutKind {
        match self {
            Disease::Diabetes => LayoutKind::Wide,
            _ => LayoutKind::Compact,
        }
    }
}

/// One model-input row: a fixed layout plus one value per column.
///
/// Vectors are derived on demand and never persisted; the layout tag is what
/// the inference adapter checks to guarantee column-for-column alignment
/// with the schema its model was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    layout: LayoutKind,
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn new(layout: LayoutKind, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), layout.width());
        Self { layout, values }
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column, if the layout has it
    pub fn get(&self, name: &str) -> Option<f64> {
        self.layout
            .column_names()
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.values[idx])
    }

    /// (column, value) pairs in layout order
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        self.layout
            .column_names()
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .collect()
    }
}
