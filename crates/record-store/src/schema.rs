//! Fixed Observation Schema
//!
//! One observation is one survey row: subject id, exam date, and 34 numeric
//! fields covering demographics, lifestyle, prior diagnoses, family history,
//! anthropometrics and laboratory values. Every field is stored as a number;
//! anything the respondent did not supply is the [`SENTINEL`], never a null,
//! so downstream parsing is total.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Missing-value sentinel written literally into the table
pub const SENTINEL: f64 = -1.0;

/// Fixed column order shared by every persisted row
pub const COLUMNS: [&str; 36] = [
    "subject_id",
    "exam_date",
    "parity",
    "sex",
    "menarche_age",
    "education",
    "smoking_onset_age",
    "drink_flag",
    "drink_amount",
    "smoke_flag",
    "smoke_amount",
    "age",
    "hypertension",
    "diabetes",
    "dyslipidemia",
    "mother_htn",
    "father_htn",
    "mother_dm",
    "father_dm",
    "weight_kg",
    "height_cm",
    "waist_cm",
    "hip_cm",
    "systolic_bp",
    "diastolic_bp",
    "pulse",
    "exercise_freq",
    "hba1c",
    "fasting_glucose",
    "homa_ir",
    "total_cholesterol",
    "hdl",
    "triglycerides",
    "ast",
    "alt",
    "creatinine",
];

/// True when a stored value stands for "not supplied"
pub fn is_missing(value: f64) -> bool {
    value.is_nan() || value == SENTINEL
}

/// One stored observation row, field order matching [`COLUMNS`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub subject_id: i64,
    /// ISO calendar date (`YYYY-MM-DD`) as written in the table
    pub exam_date: String,
    pub parity: f64,
    pub sex: f64,
    pub menarche_age: f64,
    pub education: f64,
    pub smoking_onset_age: f64,
    pub drink_flag: f64,
    pub drink_amount: f64,
    pub smoke_flag: f64,
    pub smoke_amount: f64,
    pub age: f64,
    pub hypertension: f64,
    pub diabetes: f64,
    pub dyslipidemia: f64,
    pub mother_htn: f64,
    pub father_htn: f64,
    pub mother_dm: f64,
    pub father_dm: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub waist_cm: f64,
    pub hip_cm: f64,
    pub systolic_bp: f64,
    pub diastolic_bp: f64,
    pub pulse: f64,
    pub exercise_freq: f64,
    pub hba1c: f64,
    pub fasting_glucose: f64,
    pub homa_ir: f64,
    pub total_cholesterol: f64,
    pub hdl: f64,
    pub triglycerides: f64,
    pub ast: f64,
    pub alt: f64,
    pub creatinine: f64,
}

impl Observation {
    /// Parse the exam date, tolerating a few common calendar formats
    pub fn exam_day(&self) -> Option<NaiveDate> {
        parse_date(&self.exam_date)
    }

    /// Build an observation from one CSV record in fixed column order.
    ///
    /// Coercion is per cell: a blank or unparseable cell becomes the
    /// sentinel for that field only, never an error for the row.
    pub(crate) fn from_record(record: &csv::StringRecord) -> Self {
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let num = |idx: usize| parse_cell(cell(idx));

        Self {
            subject_id: parse_id(cell(0)),
            exam_date: cell(1).trim().to_string(),
            parity: num(2),
            sex: num(3),
            menarche_age: num(4),
            education: num(5),
            smoking_onset_age: num(6),
            drink_flag: num(7),
            drink_amount: num(8),
            smoke_flag: num(9),
            smoke_amount: num(10),
            age: num(11),
            hypertension: num(12),
            diabetes: num(13),
            dyslipidemia: num(14),
            mother_htn: num(15),
            father_htn: num(16),
            mother_dm: num(17),
            father_dm: num(18),
            weight_kg: num(19),
            height_cm: num(20),
            waist_cm: num(21),
            hip_cm: num(22),
            systolic_bp: num(23),
            diastolic_bp: num(24),
            pulse: num(25),
            exercise_freq: num(26),
            hba1c: num(27),
            fasting_glucose: num(28),
            homa_ir: num(29),
            total_cholesterol: num(30),
            hdl: num(31),
            triglycerides: num(32),
            ast: num(33),
            alt: num(34),
            creatinine: num(35),
        }
    }

    /// Render the row back into fixed column order
    pub(crate) fn to_record(&self) -> Vec<String> {
        vec![
            self.subject_id.to_string(),
            self.exam_date.clone(),
            fmt_cell(self.parity),
            fmt_cell(self.sex),
            fmt_cell(self.menarche_age),
            fmt_cell(self.education),
            fmt_cell(self.smoking_onset_age),
            fmt_cell(self.drink_flag),
            fmt_cell(self.drink_amount),
            fmt_cell(self.smoke_flag),
            fmt_cell(self.smoke_amount),
            fmt_cell(self.age),
            fmt_cell(self.hypertension),
            fmt_cell(self.diabetes),
            fmt_cell(self.dyslipidemia),
            fmt_cell(self.mother_htn),
            fmt_cell(self.father_htn),
            fmt_cell(self.mother_dm),
            fmt_cell(self.father_dm),
            fmt_cell(self.weight_kg),
            fmt_cell(self.height_cm),
            fmt_cell(self.waist_cm),
            fmt_cell(self.hip_cm),
            fmt_cell(self.systolic_bp),
            fmt_cell(self.diastolic_bp),
            fmt_cell(self.pulse),
            fmt_cell(self.exercise_freq),
            fmt_cell(self.hba1c),
            fmt_cell(self.fasting_glucose),
            fmt_cell(self.homa_ir),
            fmt_cell(self.total_cholesterol),
            fmt_cell(self.hdl),
            fmt_cell(self.triglycerides),
            fmt_cell(self.ast),
            fmt_cell(self.alt),
            fmt_cell(self.creatinine),
        ]
    }
}

impl Default for Observation {
    /// An entirely unsupplied row: every field is the sentinel
    fn default() -> Self {
        Self::from_record(&csv::StringRecord::new())
    }
}

/// Draft observation as supplied by the collection surface.
///
/// Required survey answers are plain typed fields, so a missing required
/// answer cannot be constructed at all; optional answers are `Option` and
/// collapse to the sentinel on storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationDraft {
    pub subject_id: i64,
    pub exam_date: Option<NaiveDate>,
    pub parity: i32,
    pub sex: i32,
    pub education: i32,
    pub age: i32,
    pub drink_flag: i32,
    pub smoke_flag: i32,
    pub hypertension: i32,
    pub diabetes: i32,
    pub dyslipidemia: i32,
    pub weight_kg: f64,
    pub height_cm: f64,

    pub menarche_age: Option<i32>,
    pub smoking_onset_age: Option<i32>,
    pub drink_amount: Option<f64>,
    pub smoke_amount: Option<f64>,
    pub mother_htn: Option<i32>,
    pub father_htn: Option<i32>,
    pub mother_dm: Option<i32>,
    pub father_dm: Option<i32>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub pulse: Option<f64>,
    pub exercise_freq: Option<f64>,
    pub hba1c: Option<f64>,
    pub fasting_glucose: Option<f64>,
    pub homa_ir: Option<f64>,
    pub total_cholesterol: Option<f64>,
    pub hdl: Option<f64>,
    pub triglycerides: Option<f64>,
    pub ast: Option<f64>,
    pub alt: Option<f64>,
    pub creatinine: Option<f64>,
}

impl ObservationDraft {
    /// Check every required answer, returning one entry per offending field
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.exam_date.is_none() {
            errors.push(ValidationError::MissingField("exam_date"));
        }
        if self.sex != 1 && self.sex != 2 {
            errors.push(ValidationError::OutOfRange {
                field: "sex",
                value: self.sex as f64,
                min: 1.0,
                max: 2.0,
            });
        }
        for (field, value) in [
            ("parity", self.parity),
            ("drink_flag", self.drink_flag),
            ("smoke_flag", self.smoke_flag),
            ("hypertension", self.hypertension),
            ("diabetes", self.diabetes),
            ("dyslipidemia", self.dyslipidemia),
        ] {
            if value != 0 && value != 1 {
                errors.push(ValidationError::NotBinary { field, value });
            }
        }
        for (field, value) in [
            ("mother_htn", self.mother_htn),
            ("father_htn", self.father_htn),
            ("mother_dm", self.mother_dm),
            ("father_dm", self.father_dm),
        ] {
            if let Some(v) = value {
                if v != 0 && v != 1 {
                    errors.push(ValidationError::NotBinary { field, value: v });
                }
            }
        }
        if self.education < 0 {
            errors.push(ValidationError::OutOfRange {
                field: "education",
                value: self.education as f64,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if self.age < 0 {
            errors.push(ValidationError::OutOfRange {
                field: "age",
                value: self.age as f64,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if self.weight_kg <= 0.0 {
            errors.push(ValidationError::NotPositive {
                field: "weight_kg",
                value: self.weight_kg,
            });
        }
        if self.height_cm <= 0.0 {
            errors.push(ValidationError::NotPositive {
                field: "height_cm",
                value: self.height_cm,
            });
        }

        errors
    }

    /// Coerce the draft into a storable row; optional blanks become the sentinel
    pub fn into_observation(self) -> Observation {
        let opt_i = |v: Option<i32>| v.map(|x| x as f64).unwrap_or(SENTINEL);
        let opt_f = |v: Option<f64>| v.unwrap_or(SENTINEL);

        Observation {
            subject_id: self.subject_id,
            exam_date: self
                .exam_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-1".to_string()),
            parity: self.parity as f64,
            sex: self.sex as f64,
            menarche_age: opt_i(self.menarche_age),
            education: self.education as f64,
            smoking_onset_age: opt_i(self.smoking_onset_age),
            drink_flag: self.drink_flag as f64,
            drink_amount: opt_f(self.drink_amount),
            smoke_flag: self.smoke_flag as f64,
            smoke_amount: opt_f(self.smoke_amount),
            age: self.age as f64,
            hypertension: self.hypertension as f64,
            diabetes: self.diabetes as f64,
            dyslipidemia: self.dyslipidemia as f64,
            mother_htn: opt_i(self.mother_htn),
            father_htn: opt_i(self.father_htn),
            mother_dm: opt_i(self.mother_dm),
            father_dm: opt_i(self.father_dm),
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            waist_cm: opt_f(self.waist_cm),
            hip_cm: opt_f(self.hip_cm),
            systolic_bp: opt_f(self.systolic_bp),
            diastolic_bp: opt_f(self.diastolic_bp),
            pulse: opt_f(self.pulse),
            exercise_freq: opt_f(self.exercise_freq),
            hba1c: opt_f(self.hba1c),
            fasting_glucose: opt_f(self.fasting_glucose),
            homa_ir: opt_f(self.homa_ir),
            total_cholesterol: opt_f(self.total_cholesterol),
            hdl: opt_f(self.hdl),
            triglycerides: opt_f(self.triglycerides),
            ast: opt_f(self.ast),
            alt: opt_f(self.alt),
            creatinine: opt_f(self.creatinine),
        }
    }
}

/// Tolerant numeric coercion: blank or unparseable cells become the sentinel
fn parse_cell(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return SENTINEL;
    }
    trimmed.parse::<f64>().unwrap_or(SENTINEL)
}

/// Subject ids may be written as integers or floats; anything else is -1
fn parse_id(raw: &str) -> i64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v as i64,
        _ => -1,
    }
}

/// Parse a date cell, accepting the ISO form plus a few survey variants
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// Integral values print without a trailing `.0` so flags stay compact
fn fmt_cell(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
