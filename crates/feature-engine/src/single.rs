//! Single-Observation Feature Builder
//!
//! Interprets a layout descriptor over one raw row. Derivation is tolerant:
//! a sentinel or unparseable source never fails the build, it just leaves
//! that column missing, so even an entirely blank row yields a vector of
//! the full schema for shape checks.

use crate::layout::{IndicatorField, LayoutKind, Source, StatusScale, COMPACT, WIDE};
use crate::vector::{Disease, FeatureVector};
use record_store::{is_missing, Observation, SENTINEL};
use tracing::debug;

/// Derive the same-day feature vector for one disease's model
pub fn build(observation: &Observation, disease: Disease) -> FeatureVector {
    let layout = disease.layout();
    let specs = match layout {
        LayoutKind::Wide => WIDE,
        _ => COMPACT,
    };

    let values = specs
        .iter()
        .map(|spec| evaluate(spec.source, observation))
        .collect();

    debug!(
        disease = disease.name(),
        columns = specs.len(),
        "built same-day feature vector"
    );
    FeatureVector::new(layout, values)
}

fn evaluate(source: Source, observation: &Observation) -> f64 {
    match source {
        Source::SubjectId => {
            if observation.subject_id < 0 {
                SENTINEL
            } else {
                observation.subject_id as f64
            }
        }
        Source::Code(field) | Source::Continuous(field) => {
            let value = field(observation);
            if is_missing(value) {
                SENTINEL
            } else {
                value
            }
        }
        Source::Bmi => bmi(observation).unwrap_or(SENTINEL),
        Source::WaistHipRatio => waist_hip_ratio(observation).unwrap_or(SENTINEL),
        Source::TotalDrink(scale) => total_drink(observation, scale),
        Source::TotalSmoke(scale) => total_smoke(observation, scale),
        Source::Indicator(field, category) => indicator(field, category, observation),
        Source::ZeroPad => 0.0,
        Source::SentinelPad => SENTINEL,
    }
}

/// Non-missing values only; everything downstream works in `Option` space
pub(crate) fn present(value: f64) -> Option<f64> {
    (!is_missing(value)).then_some(value)
}

/// weight / (height/100)^2, only with both present and a positive height
pub(crate) fn bmi(observation: &Observation) -> Option<f64> {
    let weight = present(observation.weight_kg)?;
    let height = present(observation.height_cm)?;
    (height > 0.0).then(|| weight / (height / 100.0).powi(2))
}

/// waist / hip, only with both present and a positive hip
pub(crate) fn waist_hip_ratio(observation: &Observation) -> Option<f64> {
    let waist = present(observation.waist_cm)?;
    let hip = present(observation.hip_cm)?;
    (hip > 0.0).then(|| waist / hip)
}

/// Drink amount while currently drinking on the layout's scale, else 0
pub(crate) fn total_drink(observation: &Observation, scale: StatusScale) -> f64 {
    composite(
        scale.recode(observation.drink_flag),
        scale,
        observation.drink_amount,
    )
}

/// Smoke amount while currently smoking on the layout's scale, else 0
pub(crate) fn total_smoke(observation: &Observation, scale: StatusScale) -> f64 {
    composite(
        scale.recode(observation.smoke_flag),
        scale,
        observation.smoke_amount,
    )
}

// Inactive status and absent amount both collapse to 0, never to missing:
// the composites are totals, and "nothing to add" is a quantity.
fn composite(status: Option<i32>, scale: StatusScale, amount: f64) -> f64 {
    match (status, present(amount)) {
        (Some(code), Some(amount)) if code == scale.active_code() => amount,
        _ => 0.0,
    }
}

fn indicator(field: IndicatorField, category: i32, observation: &Observation) -> f64 {
    let code = match field {
        IndicatorField::Field(f) => {
            let value = f(observation);
            if is_missing(value) || value.fract() != 0.0 {
                None
            } else {
                Some(value as i32)
            }
        }
        IndicatorField::DrinkStatus => {
            StatusScale::NeverFormerCurrent.recode(observation.drink_flag)
        }
        IndicatorField::SmokeStatus => {
            StatusScale::NeverFormerCurrent.recode(observation.smoke_flag)
        }
    };

    match code {
        Some(code) if code == category => 1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use record_store::ObservationDraft;

    fn observation() -> Observation {
        ObservationDraft {
            subject_id: 1,
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
        .into_observation()
    }

    #[test]
    fn test_compact_end_to_end() {
        let vector = build(&observation(), Disease::Hypertension);
        assert_eq!(vector.layout(), LayoutKind::Compact);

        let bmi = vector.get("bmi").unwrap();
        assert!((bmi - 22.857).abs() < 0.01);
        // drink flag is active but no amount was given; smoke flag inactive
        assert_eq!(vector.get("total_drink"), Some(0.0));
        assert_eq!(vector.get("total_smoke"), Some(0.0));
        assert_eq!(vector.get("whr"), Some(SENTINEL));
        assert_eq!(vector.get("sex"), Some(1.0));
        assert_eq!(vector.get("age"), Some(45.0));
    }

    #[test]
    fn test_composite_takes_amount_only_while_active() {
        let mut obs = observation();
        obs.drink_amount = 2.5;
        let vector = build(&obs, Disease::Hypertension);
        assert_eq!(vector.get("total_drink"), Some(2.5));

        obs.drink_flag = 0.0;
        let vector = build(&obs, Disease::Hypertension);
        assert_eq!(vector.get("total_drink"), Some(0.0));
    }

    #[test]
    fn test_whr_guard_requires_positive_hip() {
        let mut obs = observation();
        obs.waist_cm = 80.0;
        obs.hip_cm = 100.0;
        assert_eq!(
            build(&obs, Disease::Hypertension).get("whr"),
            Some(0.8)
        );

        obs.hip_cm = 0.0;
        assert_eq!(
            build(&obs, Disease::Hypertension).get("whr"),
            Some(SENTINEL)
        );

        obs.hip_cm = 100.0;
        obs.waist_cm = SENTINEL;
        assert_eq!(
            build(&obs, Disease::Hypertension).get("whr"),
            Some(SENTINEL)
        );
    }

    #[test]
    fn test_wide_schema_is_complete_for_any_input() {
        let vector = build(&observation(), Disease::Diabetes);
        assert_eq!(vector.layout(), LayoutKind::Wide);
        assert_eq!(vector.len(), 120);
        assert_eq!(
            vector.layout().column_names(),
            LayoutKind::Wide.column_names()
        );

        // one-hot from collected fields
        assert_eq!(vector.get("sex_male"), Some(1.0));
        assert_eq!(vector.get("sex_female"), Some(0.0));
        assert_eq!(vector.get("drink_current"), Some(1.0));
        assert_eq!(vector.get("drink_never"), Some(0.0));
        assert_eq!(vector.get("smoke_never"), Some(1.0));
        assert_eq!(vector.get("edu_college"), Some(1.0));

        // blocks the survey never collects stay zero / sentinel
        for name in ["income_q1", "marital_married", "binge_weekly", "soju_freq_daily"] {
            assert_eq!(vector.get(name), Some(0.0), "{name}");
        }
        assert_eq!(vector.get("soju_quantity"), Some(SENTINEL));
        assert_eq!(vector.get("pack_years"), Some(SENTINEL));
    }

    #[test]
    fn test_wide_unseen_category_zeroes_the_block() {
        let mut obs = observation();
        obs.education = 9.0;
        let vector = build(&obs, Disease::Diabetes);
        for name in [
            "edu_none",
            "edu_elementary",
            "edu_middle_school",
            "edu_high_school",
            "edu_college",
            "edu_university",
            "edu_postgraduate",
        ] {
            assert_eq!(vector.get(name), Some(0.0), "{name}");
        }
    }

    #[test]
    fn test_blank_row_builds_all_missing_vectors() {
        let blank = Observation::default();

        let compact = build(&blank, Disease::Hypertension);
        assert_eq!(compact.len(), LayoutKind::Compact.width());
        assert_eq!(compact.get("bmi"), Some(SENTINEL));
        assert_eq!(compact.get("total_drink"), Some(0.0));

        let wide = build(&blank, Disease::Diabetes);
        assert_eq!(wide.len(), 120);
        assert_eq!(wide.get("sex_male"), Some(0.0));
        assert_eq!(wide.get("bmi"), Some(SENTINEL));
    }

    proptest! {
        #[test]
        fn prop_bmi_matches_formula(
            weight in 30.0f64..200.0,
            height in 120.0f64..210.0,
        ) {
            let mut obs = observation();
            obs.weight_kg = weight;
            obs.height_cm = height;
            let expected = weight / (height / 100.0).powi(2);
            prop_assert!((bmi(&obs).unwrap() - expected).abs() < 1e-9);
        }

        #[test]
        fn prop_bmi_missing_without_positive_height(weight in 30.0f64..200.0) {
            let mut obs = observation();
            obs.weight_kg = weight;
            obs.height_cm = SENTINEL;
            prop_assert!(bmi(&obs).is_none());
        }
    }
}
