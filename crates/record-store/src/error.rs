//! Store Error Types

use thiserror::Error;

/// Errors raised while validating a draft observation
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Value outside the allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value must be strictly positive
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// Flag fields only admit 0 or 1
    #[error("{field} must be 0 or 1, got {value}")]
    NotBinary { field: &'static str, value: i32 },

    /// Required answer absent
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors raised by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Draft rejected; one entry per offending field
    #[error("observation failed validation with {} issue(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Subject has no rows in the table
    #[error("no observations recorded for subject {0}")]
    SubjectNotFound(i64),

    /// Table header no longer matches the fixed schema
    #[error("table header does not match the fixed schema: {0}")]
    MalformedTable(String),

    /// CSV layer failure
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
