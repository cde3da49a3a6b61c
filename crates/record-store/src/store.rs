//! CSV Table Access
//!
//! One logical table per deployment. Append is read-concat-rewrite over the
//! whole file, which keeps the fixed column order authoritative but is not
//! atomic: two concurrent appenders can lose a row. Single-writer use is
//! assumed; see the type-level note before adding concurrent writers.

use crate::error::StoreError;
use crate::schema::{Observation, ObservationDraft, COLUMNS};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Append-only observation table backed by one CSV file.
///
/// Known hazard: `append` reloads and rewrites the full table without any
/// locking discipline, so concurrent appends from separate handles race.
/// The deployment model is one user, one writer.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open a store at `path`, materializing an empty table if absent
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        store.ensure_table()?;
        Ok(store)
    }

    /// Path of the backing table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Idempotent bootstrap: create the header-only table when missing
    fn ensure_table(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        writer.flush()?;
        info!("bootstrapped empty observation table at {:?}", self.path);
        Ok(())
    }

    /// Read every raw row after checking the header against the fixed schema
    fn read_raw(&self) -> Result<Vec<csv::StringRecord>, StoreError> {
        self.ensure_table()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        verify_header(&headers)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?);
        }
        Ok(rows)
    }

    /// Validate a draft and append it as one new row.
    ///
    /// Every offending required field is reported at once; the table never
    /// receives a partially-valid observation. The rewrite is flushed before
    /// returning so the next read sees a complete file.
    pub fn append(&self, draft: ObservationDraft) -> Result<Observation, StoreError> {
        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        let existing = self.read_raw()?;
        let observation = draft.into_observation();

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        writer.write_record(COLUMNS)?;
        for row in &existing {
            writer.write_record(row)?;
        }
        writer.write_record(observation.to_record())?;
        writer.flush()?;

        debug!(
            subject = observation.subject_id,
            date = %observation.exam_date,
            total_rows = existing.len() + 1,
            "appended observation"
        );
        Ok(observation)
    }

    /// All observations in file order
    pub fn load_all(&self) -> Result<Vec<Observation>, StoreError> {
        let rows = self.read_raw()?;
        Ok(rows.iter().map(Observation::from_record).collect())
    }

    /// All observations for one subject, in file order (callers sort by date)
    pub fn load_subject(&self, subject_id: i64) -> Result<Vec<Observation>, StoreError> {
        let rows: Vec<Observation> = self
            .load_all()?
            .into_iter()
            .filter(|obs| obs.subject_id == subject_id)
            .collect();

        if rows.is_empty() {
            return Err(StoreError::SubjectNotFound(subject_id));
        }
        Ok(rows)
    }
}

/// Compare the on-disk header to the fixed schema, tolerating a UTF-8 BOM
fn verify_header(headers: &csv::StringRecord) -> Result<(), StoreError> {
    if headers.len() != COLUMNS.len() {
        return Err(StoreError::MalformedTable(format!(
            "expected {} columns, found {}",
            COLUMNS.len(),
            headers.len()
        )));
    }
    for (idx, expected) in COLUMNS.iter().enumerate() {
        let actual = headers
            .get(idx)
            .unwrap_or("")
            .trim_start_matches('\u{feff}')
            .trim();
        if actual != *expected {
            return Err(StoreError::MalformedTable(format!(
                "column {idx} is {actual:?}, expected {expected:?}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SENTINEL;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;

    fn draft(subject_id: i64, day: u32) -> ObservationDraft {
        ObservationDraft {
            subject_id,
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
    fn test_bootstrap_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("observations.csv");

        let _first = RecordStore::open(&path).unwrap();
        let store = RecordStore::open(&path).unwrap();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_load_preserves_count_and_order() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("observations.csv")).unwrap();

        for day in 1..=4 {
            store.append(draft(1, day)).unwrap();
        }

        let rows = store.load_all().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].exam_date, "2025-06-01");
        assert_eq!(rows[3].exam_date, "2025-06-04");
    }

    #[test]
    fn test_blank_optional_round_trips_as_sentinel() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("observations.csv")).unwrap();

        store.append(draft(1, 1)).unwrap();
        let rows = store.load_all().unwrap();
        assert_eq!(rows[0].waist_cm, SENTINEL);
        assert_eq!(rows[0].hba1c, SENTINEL);
        assert_eq!(rows[0].weight_kg, 70.0);
    }

    #[test]
    fn test_validation_rejects_before_write() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("observations.csv")).unwrap();

        let bad = ObservationDraft {
            sex: 9,
            height_cm: 0.0,
            ..draft(1, 1)
        };
        match store.append(bad) {
            Err(StoreError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_subject_not_found() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path().join("observations.csv")).unwrap();
        store.append(draft(1, 1)).unwrap();

        assert!(matches!(
            store.load_subject(2),
            Err(StoreError::SubjectNotFound(2))
        ));
        assert_eq!(store.load_subject(1).unwrap().len(), 1);
    }

    #[test]
    fn test_garbage_cell_coerces_to_sentinel_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observations.csv");
        let store = RecordStore::open(&path).unwrap();
        store.append(draft(1, 1)).unwrap();

        // Corrupt one numeric cell in place; the row must still load.
        let text = fs::read_to_string(&path).unwrap();
        let corrupted = text.replace("70,175", "garbage,175");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(corrupted.as_bytes()).unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(rows[0].weight_kg, SENTINEL);
        assert_eq!(rows[0].height_cm, 175.0);
    }

    #[test]
    fn test_bom_on_header_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observations.csv");
        let store = RecordStore::open(&path).unwrap();
        store.append(draft(1, 1)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut file = fs::File::create(&path).unwrap();
        file.write_all("\u{feff}".as_bytes()).unwrap();
        file.write_all(text.as_bytes()).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_foreign_header_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("observations.csv");
        fs::write(&path, "a,b,c\n1,2,3\n").unwrap();

        let store = RecordStore { path };
        assert!(matches!(
            store.load_all(),
            Err(StoreError::MalformedTable(_))
        ));
    }
}
