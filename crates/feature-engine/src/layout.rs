//! Declarative Feature Layouts
//!
//! Each model-input schema is a const table of (column name → source).
//! The builders interpret these tables instead of hand-enumerating columns,
//! so the compact and one-hot schemas cannot drift apart, and a column the
//! survey never collects is still emitted (zero indicators, sentinel
//! continuous) to keep training-time alignment.

use record_store::{is_missing, Observation};
use serde::{Deserialize, Serialize};

/// Accessor into one raw observation field
pub(crate) type FieldFn = fn(&Observation) -> f64;

/// Which fixed schema a vector follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Same-day, raw codes and measures
    Compact,
    /// Same-day, every categorical one-hot expanded
    Wide,
    /// Whole-history summary (means, changes, ratios)
    Followup,
}

impl LayoutKind {
    /// Number of columns in this schema
    pub fn width(&self) -> usize {
        match self {
            LayoutKind::Compact => COMPACT.len(),
            LayoutKind::Wide => WIDE.len(),
            LayoutKind::Followup => FOLLOWUP.len(),
        }
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<&'static str> {
        match self {
            LayoutKind::Compact => COMPACT.iter().map(|c| c.name).collect(),
            LayoutKind::Wide => WIDE.iter().map(|c| c.name).collect(),
            LayoutKind::Followup => FOLLOWUP.iter().map(|c| c.name).collect(),
        }
    }
}

/// Drinking/smoking status encoding used by a layout.
///
/// The compact schema keeps the survey's daily binary flag; the wide
/// schema's training data used a 1 never / 2 former / 3 current scale, so
/// the flag is recoded before use. "Currently active" is code 1 on the
/// binary scale and code 3 on the status scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusScale {
    Binary,
    NeverFormerCurrent,
}

impl StatusScale {
    pub(crate) fn active_code(self) -> i32 {
        match self {
            StatusScale::Binary => 1,
            StatusScale::NeverFormerCurrent => 3,
        }
    }

    /// Map a stored 0/1 flag onto this scale; missing or foreign codes stay missing
    pub(crate) fn recode(self, flag: f64) -> Option<i32> {
        if is_missing(flag) {
            return None;
        }
        match (self, flag as i32) {
            (StatusScale::Binary, code @ (0 | 1)) => Some(code),
            (StatusScale::NeverFormerCurrent, 0) => Some(1),
            (StatusScale::NeverFormerCurrent, 1) => Some(3),
            _ => None,
        }
    }
}

/// What an indicator column tests against its category code
#[derive(Debug, Clone, Copy)]
pub(crate) enum IndicatorField {
    /// A raw stored code
    Field(FieldFn),
    /// Drinking status on the never/former/current scale
    DrinkStatus,
    /// Smoking status on the never/former/current scale
    SmokeStatus,
}

/// How one column of a per-observation layout is produced
#[derive(Debug, Clone, Copy)]
pub(crate) enum Source {
    /// Subject identifier
    SubjectId,
    /// Categorical/flag code passed through (sentinel when missing)
    Code(FieldFn),
    /// Continuous measure passed through (sentinel when missing)
    Continuous(FieldFn),
    /// weight / (height/100)^2, guarded on presence and height > 0
    Bmi,
    /// waist / hip, guarded on presence and hip > 0
    WaistHipRatio,
    /// Drink amount when currently drinking on the given scale, else 0
    TotalDrink(StatusScale),
    /// Smoke amount when currently smoking on the given scale, else 0
    TotalSmoke(StatusScale),
    /// 1.0 when the (possibly recoded) field equals the category, else 0.0;
    /// a missing or out-of-vocabulary source zeroes the whole block
    Indicator(IndicatorField, i32),
    /// Never collected by this survey; fixed 0 for indicator alignment
    ZeroPad,
    /// Never collected by this survey; sentinel for continuous alignment
    SentinelPad,
}

/// One column of a per-observation layout
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnSpec {
    pub name: &'static str,
    pub source: Source,
}

const fn col(name: &'static str, source: Source) -> ColumnSpec {
    ColumnSpec { name, source }
}

/// A per-observation series the aggregator reduces over history
#[derive(Debug, Clone, Copy)]
pub(crate) enum Series {
    Field(FieldFn),
    Bmi,
    Whr,
    TotalDrink,
    TotalSmoke,
}

/// How one column of the followup layout is aggregated
#[derive(Debug, Clone, Copy)]
pub(crate) enum AggregateSource {
    /// Subject identifier from the earliest row
    SubjectId,
    /// Most frequent non-missing value (first to reach the maximum wins)
    Mode(FieldFn),
    /// Most recent non-missing value (state fields)
    Latest(FieldFn),
    /// Mean over non-missing per-observation values
    Mean(Series),
    /// Latest non-missing minus earliest non-missing (0 for a single value)
    Change(Series),
    /// Fraction of non-missing observations where the flag was active
    ActiveRatio(FieldFn),
    /// Age at the earliest observation
    BaselineAge,
}

/// One column of the followup layout, with its human-readable label
#[derive(Debug, Clone, Copy)]
pub(crate) struct FollowupSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub source: AggregateSource,
}

const fn agg(
    name: &'static str,
    label: &'static str,
    source: AggregateSource,
) -> FollowupSpec {
    FollowupSpec {
        name,
        label,
        source,
    }
}

/// Human-readable description of a followup feature, for explanation text
pub fn feature_label(name: &str) -> Option<&'static str> {
    FOLLOWUP
        .iter()
        .find(|spec| spec.name == name)
        .map(|spec| spec.label)
}

/// Compact same-day schema: raw codes and measures plus the derived terms
pub(crate) const COMPACT: &[ColumnSpec] = &[
    col("subject_id", Source::SubjectId),
    col("sex", Source::Code(|o| o.sex)),
    col("parity", Source::Code(|o| o.parity)),
    col("menarche_age", Source::Code(|o| o.menarche_age)),
    col("education", Source::Code(|o| o.education)),
    col("smoking_onset_age", Source::Code(|o| o.smoking_onset_age)),
    col("hypertension", Source::Code(|o| o.hypertension)),
    col("diabetes", Source::Code(|o| o.diabetes)),
    col("dyslipidemia", Source::Code(|o| o.dyslipidemia)),
    col("father_htn", Source::Code(|o| o.father_htn)),
    col("mother_htn", Source::Code(|o| o.mother_htn)),
    col("father_dm", Source::Code(|o| o.father_dm)),
    col("mother_dm", Source::Code(|o| o.mother_dm)),
    col("bmi", Source::Bmi),
    col("weight", Source::Continuous(|o| o.weight_kg)),
    col("whr", Source::WaistHipRatio),
    col("systolic_bp", Source::Continuous(|o| o.systolic_bp)),
    col("diastolic_bp", Source::Continuous(|o| o.diastolic_bp)),
    col("pulse", Source::Continuous(|o| o.pulse)),
    col("total_drink", Source::TotalDrink(StatusScale::Binary)),
    col("total_smoke", Source::TotalSmoke(StatusScale::Binary)),
    col("exercise_freq", Source::Continuous(|o| o.exercise_freq)),
    col("hba1c", Source::Continuous(|o| o.hba1c)),
    col("fasting_glucose", Source::Continuous(|o| o.fasting_glucose)),
    col("homa_ir", Source::Continuous(|o| o.homa_ir)),
    col("total_cholesterol", Source::Continuous(|o| o.total_cholesterol)),
    col("hdl", Source::Continuous(|o| o.hdl)),
    col("triglycerides", Source::Continuous(|o| o.triglycerides)),
    col("ast", Source::Continuous(|o| o.ast)),
    col("alt", Source::Continuous(|o| o.alt)),
    col("creatinine", Source::Continuous(|o| o.creatinine)),
    col("age", Source::Continuous(|o| o.age)),
];

/// Wide same-day schema: the diabetes model's training survey expanded every
/// categorical into indicators, including blocks this survey never asks
/// about. Those blocks are still emitted (zeros / sentinel) because the
/// adapter needs column-for-column alignment. 120 columns.
pub(crate) const WIDE: &[ColumnSpec] = &[
    // demographics
    col("sex_male", Source::Indicator(IndicatorField::Field(|o| o.sex), 1)),
    col("sex_female", Source::Indicator(IndicatorField::Field(|o| o.sex), 2)),
    col("age", Source::Continuous(|o| o.age)),
    col("edu_none", Source::Indicator(IndicatorField::Field(|o| o.education), 0)),
    col("edu_elementary", Source::Indicator(IndicatorField::Field(|o| o.education), 1)),
    col("edu_middle_school", Source::Indicator(IndicatorField::Field(|o| o.education), 2)),
    col("edu_high_school", Source::Indicator(IndicatorField::Field(|o| o.education), 3)),
    col("edu_college", Source::Indicator(IndicatorField::Field(|o| o.education), 4)),
    col("edu_university", Source::Indicator(IndicatorField::Field(|o| o.education), 5)),
    col("edu_postgraduate", Source::Indicator(IndicatorField::Field(|o| o.education), 6)),
    // household income bracket: not collected here
    col("income_q1", Source::ZeroPad),
    col("income_q2", Source::ZeroPad),
    col("income_q3", Source::ZeroPad),
    col("income_q4", Source::ZeroPad),
    col("income_q5", Source::ZeroPad),
    col("income_q6", Source::ZeroPad),
    col("income_q7", Source::ZeroPad),
    col("income_q8", Source::ZeroPad),
    // marital status: not collected here
    col("marital_single", Source::ZeroPad),
    col("marital_married", Source::ZeroPad),
    col("marital_divorced", Source::ZeroPad),
    col("marital_widowed", Source::ZeroPad),
    col("marital_separated", Source::ZeroPad),
    // reproductive history
    col("parity_none", Source::Indicator(IndicatorField::Field(|o| o.parity), 0)),
    col("parity_any", Source::Indicator(IndicatorField::Field(|o| o.parity), 1)),
    col("menopause_no", Source::ZeroPad),
    col("menopause_yes", Source::ZeroPad),
    col("menopause_age", Source::SentinelPad),
    col("menarche_age", Source::Continuous(|o| o.menarche_age)),
    col("pregnancies", Source::SentinelPad),
    // drinking pattern (never/former/current scale)
    col("drink_never", Source::Indicator(IndicatorField::DrinkStatus, 1)),
    col("drink_former", Source::Indicator(IndicatorField::DrinkStatus, 2)),
    col("drink_current", Source::Indicator(IndicatorField::DrinkStatus, 3)),
    col("alcohol_onset_age", Source::SentinelPad),
    // smoking pattern
    col("smoke_never", Source::Indicator(IndicatorField::SmokeStatus, 1)),
    col("smoke_former", Source::Indicator(IndicatorField::SmokeStatus, 2)),
    col("smoke_current", Source::Indicator(IndicatorField::SmokeStatus, 3)),
    col("smoking_onset_age", Source::Continuous(|o| o.smoking_onset_age)),
    col("pack_years", Source::SentinelPad),
    col("passive_smoke_no", Source::ZeroPad),
    col("passive_smoke_yes", Source::ZeroPad),
    // exercise frequency bins
    col("exercise_none", Source::Indicator(IndicatorField::Field(|o| o.exercise_freq), 0)),
    col("exercise_1_2_weekly", Source::Indicator(IndicatorField::Field(|o| o.exercise_freq), 1)),
    col("exercise_3_4_weekly", Source::Indicator(IndicatorField::Field(|o| o.exercise_freq), 2)),
    col("exercise_5_6_weekly", Source::Indicator(IndicatorField::Field(|o| o.exercise_freq), 3)),
    col("exercise_daily", Source::Indicator(IndicatorField::Field(|o| o.exercise_freq), 4)),
    col("exercise_duration_min", Source::SentinelPad),
    // heavy-episode drinking: not collected here
    col("binge_never", Source::ZeroPad),
    col("binge_monthly_or_less", Source::ZeroPad),
    col("binge_monthly", Source::ZeroPad),
    col("binge_weekly", Source::ZeroPad),
    col("binge_daily", Source::ZeroPad),
    // per-beverage frequency/quantity: not collected here
    col("soju_freq_never", Source::ZeroPad),
    col("soju_freq_monthly_or_less", Source::ZeroPad),
    col("soju_freq_2_4_monthly", Source::ZeroPad),
    col("soju_freq_2_3_weekly", Source::ZeroPad),
    col("soju_freq_4_plus_weekly", Source::ZeroPad),
    col("soju_freq_daily", Source::ZeroPad),
    col("soju_quantity", Source::SentinelPad),
    col("beer_freq_never", Source::ZeroPad),
    col("beer_freq_monthly_or_less", Source::ZeroPad),
    col("beer_freq_2_4_monthly", Source::ZeroPad),
    col("beer_freq_2_3_weekly", Source::ZeroPad),
    col("beer_freq_4_plus_weekly", Source::ZeroPad),
    col("beer_freq_daily", Source::ZeroPad),
    col("beer_quantity", Source::SentinelPad),
    col("wine_freq_never", Source::ZeroPad),
    col("wine_freq_monthly_or_less", Source::ZeroPad),
    col("wine_freq_2_4_monthly", Source::ZeroPad),
    col("wine_freq_2_3_weekly", Source::ZeroPad),
    col("wine_freq_4_plus_weekly", Source::ZeroPad),
    col("wine_freq_daily", Source::ZeroPad),
    col("wine_quantity", Source::SentinelPad),
    col("spirits_freq_never", Source::ZeroPad),
    col("spirits_freq_monthly_or_less", Source::ZeroPad),
    col("spirits_freq_2_4_monthly", Source::ZeroPad),
    col("spirits_freq_2_3_weekly", Source::ZeroPad),
    col("spirits_freq_4_plus_weekly", Source::ZeroPad),
    col("spirits_freq_daily", Source::ZeroPad),
    col("spirits_quantity", Source::SentinelPad),
    col("rice_wine_freq_never", Source::ZeroPad),
    col("rice_wine_freq_monthly_or_less", Source::ZeroPad),
    col("rice_wine_freq_2_4_monthly", Source::ZeroPad),
    col("rice_wine_freq_2_3_weekly", Source::ZeroPad),
    col("rice_wine_freq_4_plus_weekly", Source::ZeroPad),
    col("rice_wine_freq_daily", Source::ZeroPad),
    col("rice_wine_quantity", Source::SentinelPad),
    col("mixed_freq_never", Source::ZeroPad),
    col("mixed_freq_monthly_or_less", Source::ZeroPad),
    col("mixed_freq_2_4_monthly", Source::ZeroPad),
    col("mixed_freq_2_3_weekly", Source::ZeroPad),
    col("mixed_freq_4_plus_weekly", Source::ZeroPad),
    col("mixed_freq_daily", Source::ZeroPad),
    col("mixed_quantity", Source::SentinelPad),
    // composites
    col("total_drink", Source::TotalDrink(StatusScale::NeverFormerCurrent)),
    col("total_smoke", Source::TotalSmoke(StatusScale::NeverFormerCurrent)),
    // anthropometrics
    col("height", Source::Continuous(|o| o.height_cm)),
    col("weight", Source::Continuous(|o| o.weight_kg)),
    col("bmi", Source::Bmi),
    col("waist", Source::Continuous(|o| o.waist_cm)),
    col("hip", Source::Continuous(|o| o.hip_cm)),
    col("systolic_bp", Source::Continuous(|o| o.systolic_bp)),
    col("diastolic_bp", Source::Continuous(|o| o.diastolic_bp)),
    col("pulse", Source::Continuous(|o| o.pulse)),
    // laboratory
    col("hba1c", Source::Continuous(|o| o.hba1c)),
    col("fasting_glucose", Source::Continuous(|o| o.fasting_glucose)),
    col("homa_ir", Source::Continuous(|o| o.homa_ir)),
    col("total_cholesterol", Source::Continuous(|o| o.total_cholesterol)),
    col("hdl", Source::Continuous(|o| o.hdl)),
    col("triglycerides", Source::Continuous(|o| o.triglycerides)),
    col("ast", Source::Continuous(|o| o.ast)),
    col("alt", Source::Continuous(|o| o.alt)),
    col("creatinine", Source::Continuous(|o| o.creatinine)),
    // prior diagnoses and family history stay integer-coded
    col("hypertension", Source::Code(|o| o.hypertension)),
    col("diabetes", Source::Code(|o| o.diabetes)),
    col("dyslipidemia", Source::Code(|o| o.dyslipidemia)),
    col("mother_htn", Source::Code(|o| o.mother_htn)),
    col("father_htn", Source::Code(|o| o.father_htn)),
    col("mother_dm", Source::Code(|o| o.mother_dm)),
    col("father_dm", Source::Code(|o| o.father_dm)),
];

/// Whole-history summary schema for the ten-year models
pub(crate) const FOLLOWUP: &[FollowupSpec] = &[
    agg("subject_id", "subject identifier", AggregateSource::SubjectId),
    agg("sex", "sex", AggregateSource::Mode(|o| o.sex)),
    agg("parity", "childbirth history", AggregateSource::Latest(|o| o.parity)),
    agg("menarche_age", "age at menarche", AggregateSource::Mode(|o| o.menarche_age)),
    agg("education", "education level", AggregateSource::Mode(|o| o.education)),
    agg(
        "smoking_onset_age",
        "age when smoking began",
        AggregateSource::Mode(|o| o.smoking_onset_age),
    ),
    agg(
        "hypertension",
        "prior hypertension diagnosis",
        AggregateSource::Latest(|o| o.hypertension),
    ),
    agg("diabetes", "prior diabetes diagnosis", AggregateSource::Latest(|o| o.diabetes)),
    agg(
        "dyslipidemia",
        "prior dyslipidemia diagnosis",
        AggregateSource::Latest(|o| o.dyslipidemia),
    ),
    agg("father_htn", "father with hypertension", AggregateSource::Latest(|o| o.father_htn)),
    agg("mother_htn", "mother with hypertension", AggregateSource::Latest(|o| o.mother_htn)),
    agg("father_dm", "father with diabetes", AggregateSource::Latest(|o| o.father_dm)),
    agg("mother_dm", "mother with diabetes", AggregateSource::Latest(|o| o.mother_dm)),
    agg("bmi_mean", "body mass index, average", AggregateSource::Mean(Series::Bmi)),
    agg("bmi_change", "body mass index, change", AggregateSource::Change(Series::Bmi)),
    agg("weight_mean", "weight, average", AggregateSource::Mean(Series::Field(|o| o.weight_kg))),
    agg(
        "weight_change",
        "weight, change",
        AggregateSource::Change(Series::Field(|o| o.weight_kg)),
    ),
    agg("whr_mean", "waist-hip ratio, average", AggregateSource::Mean(Series::Whr)),
    agg("whr_change", "waist-hip ratio, change", AggregateSource::Change(Series::Whr)),
    agg(
        "systolic_bp_mean",
        "systolic blood pressure, average",
        AggregateSource::Mean(Series::Field(|o| o.systolic_bp)),
    ),
    agg(
        "systolic_bp_change",
        "systolic blood pressure, change",
        AggregateSource::Change(Series::Field(|o| o.systolic_bp)),
    ),
    agg(
        "diastolic_bp_mean",
        "diastolic blood pressure, average",
        AggregateSource::Mean(Series::Field(|o| o.diastolic_bp)),
    ),
    agg(
        "diastolic_bp_change",
        "diastolic blood pressure, change",
        AggregateSource::Change(Series::Field(|o| o.diastolic_bp)),
    ),
    agg("pulse_mean", "pulse, average", AggregateSource::Mean(Series::Field(|o| o.pulse))),
    agg("pulse_change", "pulse, change", AggregateSource::Change(Series::Field(|o| o.pulse))),
    agg("total_drink_mean", "alcohol intake, average", AggregateSource::Mean(Series::TotalDrink)),
    agg(
        "total_drink_change",
        "alcohol intake, change",
        AggregateSource::Change(Series::TotalDrink),
    ),
    agg("total_smoke_mean", "daily smoking, average", AggregateSource::Mean(Series::TotalSmoke)),
    agg(
        "total_smoke_change",
        "daily smoking, change",
        AggregateSource::Change(Series::TotalSmoke),
    ),
    agg(
        "exercise_freq_mean",
        "exercise frequency, average",
        AggregateSource::Mean(Series::Field(|o| o.exercise_freq)),
    ),
    agg(
        "exercise_freq_change",
        "exercise frequency, change",
        AggregateSource::Change(Series::Field(|o| o.exercise_freq)),
    ),
    agg("hba1c_mean", "HbA1c, average", AggregateSource::Mean(Series::Field(|o| o.hba1c))),
    agg("hba1c_change", "HbA1c, change", AggregateSource::Change(Series::Field(|o| o.hba1c))),
    agg(
        "fasting_glucose_mean",
        "fasting glucose, average",
        AggregateSource::Mean(Series::Field(|o| o.fasting_glucose)),
    ),
    agg(
        "fasting_glucose_change",
        "fasting glucose, change",
        AggregateSource::Change(Series::Field(|o| o.fasting_glucose)),
    ),
    agg(
        "homa_ir_mean",
        "insulin resistance, average",
        AggregateSource::Mean(Series::Field(|o| o.homa_ir)),
    ),
    agg(
        "homa_ir_change",
        "insulin resistance, change",
        AggregateSource::Change(Series::Field(|o| o.homa_ir)),
    ),
    agg(
        "total_cholesterol_mean",
        "total cholesterol, average",
        AggregateSource::Mean(Series::Field(|o| o.total_cholesterol)),
    ),
    agg(
        "total_cholesterol_change",
        "total cholesterol, change",
        AggregateSource::Change(Series::Field(|o| o.total_cholesterol)),
    ),
    agg("hdl_mean", "HDL cholesterol, average", AggregateSource::Mean(Series::Field(|o| o.hdl))),
    agg(
        "hdl_change",
        "HDL cholesterol, change",
        AggregateSource::Change(Series::Field(|o| o.hdl)),
    ),
    agg(
        "triglycerides_mean",
        "triglycerides, average",
        AggregateSource::Mean(Series::Field(|o| o.triglycerides)),
    ),
    agg(
        "triglycerides_change",
        "triglycerides, change",
        AggregateSource::Change(Series::Field(|o| o.triglycerides)),
    ),
    agg("ast_mean", "liver enzyme AST, average", AggregateSource::Mean(Series::Field(|o| o.ast))),
    agg(
        "ast_change",
        "liver enzyme AST, change",
        AggregateSource::Change(Series::Field(|o| o.ast)),
    ),
    agg("alt_mean", "liver enzyme ALT, average", AggregateSource::Mean(Series::Field(|o| o.alt))),
    agg(
        "alt_change",
        "liver enzyme ALT, change",
        AggregateSource::Change(Series::Field(|o| o.alt)),
    ),
    agg(
        "creatinine_mean",
        "creatinine, average",
        AggregateSource::Mean(Series::Field(|o| o.creatinine)),
    ),
    agg(
        "creatinine_change",
        "creatinine, change",
        AggregateSource::Change(Series::Field(|o| o.creatinine)),
    ),
    agg(
        "drink_ratio",
        "share of visits with drinking",
        AggregateSource::ActiveRatio(|o| o.drink_flag),
    ),
    agg(
        "smoke_ratio",
        "share of visits with smoking",
        AggregateSource::ActiveRatio(|o| o.smoke_flag),
    ),
    agg("age", "age at first observation", AggregateSource::BaselineAge),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_schema_is_exactly_120_columns() {
        assert_eq!(LayoutKind::Wide.width(), 120);
    }

    #[test]
    fn test_no_duplicate_column_names() {
        for layout in [LayoutKind::Compact, LayoutKind::Wide, LayoutKind::Followup] {
            let names = layout.column_names();
            let mut unique = names.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), names.len(), "{layout:?} has duplicate columns");
        }
    }

    #[test]
    fn test_status_recode() {
        assert_eq!(StatusScale::Binary.recode(1.0), Some(1));
        assert_eq!(StatusScale::NeverFormerCurrent.recode(0.0), Some(1));
        assert_eq!(StatusScale::NeverFormerCurrent.recode(1.0), Some(3));
        assert_eq!(StatusScale::NeverFormerCurrent.recode(-1.0), None);
        assert_eq!(StatusScale::NeverFormerCurrent.recode(f64::NAN), None);
    }

    #[test]
    fn test_followup_labels_resolve() {
        assert_eq!(feature_label("bmi_mean"), Some("body mass index, average"));
        assert!(feature_label("no_such_feature").is_none());
    }
}
