//! Longitudinal Feature Aggregator
//!
//! Reduces one subject's full observation history (sorted by exam date,
//! stable) into the single summary row the ten-year models take: means and
//! changes for continuous measures, mode imputation for demographics,
//! recency for state fields, active ratios for behavior flags, baseline
//! age. Derived measures are recomputed per observation before reduction so
//! one missing height only drops that timepoint, not the whole series.

use crate::layout::{AggregateSource, FieldFn, FollowupSpec, LayoutKind, Series, StatusScale, FOLLOWUP};
use crate::single::{bmi, present, total_drink, total_smoke, waist_hip_ratio};
use crate::stats;
use crate::vector::FeatureVector;
use record_store::{Observation, SENTINEL};
use tracing::debug;

/// Summarize a subject's whole history into one followup-layout vector.
///
/// An empty history yields an all-missing vector of the full schema.
pub fn aggregate(history: &[Observation]) -> FeatureVector {
    let mut ordered: Vec<&Observation> = history.iter().collect();
    // stable: rows with equal (or unparseable) dates keep their file order
    ordered.sort_by_key(|obs| obs.exam_day());

    let values = FOLLOWUP
        .iter()
        .map(|spec| evaluate(spec, &ordered))
        .collect();

    debug!(
        observations = ordered.len(),
        "aggregated longitudinal feature vector"
    );
    FeatureVector::new(LayoutKind::Followup, values)
}

fn evaluate(spec: &FollowupSpec, ordered: &[&Observation]) -> f64 {
    match spec.source {
        AggregateSource::SubjectId => ordered
            .first()
            .map(|obs| obs.subject_id)
            .filter(|id| *id >= 0)
            .map(|id| id as f64)
            .unwrap_or(SENTINEL),
        AggregateSource::Mode(field) => stats::mode(&collect(ordered, field)),
        AggregateSource::Latest(field) => stats::latest(&collect(ordered, field)),
        AggregateSource::Mean(series) => stats::mean(&series_values(ordered, series)),
        AggregateSource::Change(series) => stats::change(&series_values(ordered, series)),
        AggregateSource::ActiveRatio(field) => stats::active_ratio(&collect(ordered, field)),
        AggregateSource::BaselineAge => stats::earliest(&collect(ordered, |obs| obs.age)),
    }
}

/// Non-missing raw values of one field, in date order
fn collect(ordered: &[&Observation], field: FieldFn) -> Vec<f64> {
    ordered
        .iter()
        .filter_map(|obs| present(field(obs)))
        .collect()
}

/// Non-missing per-observation values of a (possibly derived) series
fn series_values(ordered: &[&Observation], series: Series) -> Vec<f64> {
    ordered
        .iter()
        .filter_map(|obs| series_value(obs, series))
        .collect()
}

fn series_value(observation: &Observation, series: Series) -> Option<f64> {
    match series {
        Series::Field(field) => present(field(observation)),
        Series::Bmi => bmi(observation),
        Series::Whr => waist_hip_ratio(observation),
        // composites default to 0 when inactive or unsupplied, so every
        // observation contributes a point to the series
        Series::TotalDrink => Some(total_drink(observation, StatusScale::Binary)),
        Series::TotalSmoke => Some(total_smoke(observation, StatusScale::Binary)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(date: &str) -> Observation {
        Observation {
            subject_id: 1,
            exam_date: date.to_string(),
            ..Observation::default()
        }
    }

    #[test]
    fn test_empty_history_is_all_missing() {
        let vector = aggregate(&[]);
        assert_eq!(vector.len(), LayoutKind::Followup.width());
        assert_eq!(vector.get("subject_id"), Some(SENTINEL));
        assert_eq!(vector.get("sex"), Some(SENTINEL));
        assert!(vector.get("weight_mean").unwrap().is_nan());
        assert!(vector.get("drink_ratio").unwrap().is_nan());
        assert_eq!(vector.get("age"), Some(SENTINEL));
    }

    #[test]
    fn test_single_observation_history() {
        let mut obs = observation("2025-06-01");
        obs.weight_kg = 70.0;
        obs.height_cm = 175.0;
        obs.drink_flag = 1.0;
        obs.smoke_flag = 0.0;
        obs.age = 45.0;

        let vector = aggregate(&[obs]);
        assert_eq!(vector.get("weight_mean"), Some(70.0));
        assert_eq!(vector.get("weight_change"), Some(0.0));
        assert_eq!(vector.get("bmi_change"), Some(0.0));
        assert_eq!(vector.get("drink_ratio"), Some(1.0));
        assert_eq!(vector.get("smoke_ratio"), Some(0.0));
        assert_eq!(vector.get("age"), Some(45.0));
    }

    #[test]
    fn test_mean_and_change_over_two_dates() {
        let mut first = observation("2025-01-01");
        first.systolic_bp = 10.0;
        let mut second = observation("2025-02-01");
        second.systolic_bp = 20.0;

        // file order deliberately reversed; the date sort must fix it
        let vector = aggregate(&[second, first]);
        assert_eq!(vector.get("systolic_bp_mean"), Some(15.0));
        assert_eq!(vector.get("systolic_bp_change"), Some(10.0));
    }

    #[test]
    fn test_sentinel_points_are_excluded() {
        let mut first = observation("2025-01-01");
        first.pulse = SENTINEL;
        let mut second = observation("2025-02-01");
        second.pulse = 64.0;

        let vector = aggregate(&[first, second]);
        assert_eq!(vector.get("pulse_mean"), Some(64.0));
        // only one non-missing point, so no change is observable
        assert_eq!(vector.get("pulse_change"), Some(0.0));
    }

    #[test]
    fn test_mode_imputation_for_demographics() {
        let mut rows = Vec::new();
        for (day, education) in [(1, 2.0), (2, 2.0), (3, 3.0)] {
            let mut obs = observation(&format!("2025-06-0{day}"));
            obs.education = education;
            rows.push(obs);
        }
        assert_eq!(aggregate(&rows).get("education"), Some(2.0));
    }

    #[test]
    fn test_state_fields_take_most_recent_value() {
        let mut first = observation("2025-01-01");
        first.hypertension = 0.0;
        first.parity = 0.0;
        let mut second = observation("2025-06-01");
        second.hypertension = 1.0;
        second.parity = 1.0;
        let mut third = observation("2025-12-01");
        third.hypertension = SENTINEL;
        third.parity = SENTINEL;

        let vector = aggregate(&[first, second, third]);
        assert_eq!(vector.get("hypertension"), Some(1.0));
        assert_eq!(vector.get("parity"), Some(1.0));
    }

    #[test]
    fn test_age_is_baseline_not_latest() {
        let mut first = observation("2025-01-01");
        first.age = 45.0;
        let mut second = observation("2026-01-01");
        second.age = 46.0;

        assert_eq!(aggregate(&[second, first]).get("age"), Some(45.0));
    }

    #[test]
    fn test_bmi_recomputed_per_observation() {
        let mut first = observation("2025-01-01");
        first.weight_kg = 70.0;
        first.height_cm = SENTINEL; // this timepoint contributes nothing
        let mut second = observation("2025-02-01");
        second.weight_kg = 80.0;
        second.height_cm = 200.0;

        let vector = aggregate(&[first, second]);
        assert_eq!(vector.get("bmi_mean"), Some(20.0));
        assert_eq!(vector.get("bmi_change"), Some(0.0));
    }

    #[test]
    fn test_drink_ratio_counts_active_share() {
        let mut rows = Vec::new();
        for (day, flag) in [(1, 1.0), (2, 0.0), (3, 1.0), (4, SENTINEL)] {
            let mut obs = observation(&format!("2025-06-0{day}"));
            obs.drink_flag = flag;
            rows.push(obs);
        }
        let vector = aggregate(&rows);
        let ratio = vector.get("drink_ratio").unwrap();
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_composites_average_over_every_visit() {
        let mut first = observation("2025-01-01");
        first.drink_flag = 1.0;
        first.drink_amount = 3.0;
        let mut second = observation("2025-02-01");
        second.drink_flag = 0.0;
        second.drink_amount = 5.0; // ignored: not currently drinking

        let vector = aggregate(&[first, second]);
        assert_eq!(vector.get("total_drink_mean"), Some(1.5));
        assert_eq!(vector.get("total_drink_change"), Some(-3.0));
    }

    #[test]
    fn test_equal_dates_keep_file_order() {
        let mut first = observation("2025-06-01");
        first.dyslipidemia = 0.0;
        let mut second = observation("2025-06-01");
        second.dyslipidemia = 1.0;

        assert_eq!(aggregate(&[first, second]).get("dyslipidemia"), Some(1.0));
    }
}
