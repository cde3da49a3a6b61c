//! Missing-Aware Sequence Reductions
//!
//! Inputs are the non-missing values of one measure in date order; the
//! caller has already dropped sentinels. Statistical reductions return NaN
//! on empty input (the value is undefined), categorical reductions return
//! the sentinel (the code for "not supplied").

use record_store::SENTINEL;

/// Arithmetic mean; NaN when no values exist
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Latest minus earliest; 0 for a single value, NaN when none exist
pub fn change(values: &[f64]) -> f64 {
    match values {
        [] => f64::NAN,
        [_single] => 0.0,
        [first, .., last] => last - first,
    }
}

/// Most frequent value; ties go to the first value reaching the maximum
/// frequency in iteration order. Sentinel when no values exist.
pub fn mode(values: &[f64]) -> f64 {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best = SENTINEL;
    let mut best_count = 0;
    for (value, count) in counts {
        if count > best_count {
            best = value;
            best_count = count;
        }
    }
    best
}

/// Last value in sequence order; sentinel when none exist
pub fn latest(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(SENTINEL)
}

/// First value in sequence order; sentinel when none exist
pub fn earliest(values: &[f64]) -> f64 {
    values.first().copied().unwrap_or(SENTINEL)
}

/// Fraction of observations where a 0/1 flag was active; NaN when none exist
pub fn active_ratio(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
