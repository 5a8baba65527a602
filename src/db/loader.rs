//! Bulk CSV → `patients` table load.
//!
//! Runs once at startup, inside a single transaction, before the HTTP
//! listener binds.

use std::io::Read;
use std::path::Path;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::repository::insert_patient;
use super::DatabaseError;
use crate::models::{PatientField, PatientRecord};

/// Outcome of a load, logged at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub source_missing: bool,
}

/// Raw CSV row. Every cell is read as text; coercion happens in
/// `into_record` so a blank numeric cell becomes `None`, not an error.
#[derive(Debug, Deserialize)]
struct CsvRow {
    patient_id: String,
    patient_name: String,
    age: String,
    gender: String,
    diagnosis: String,
    visit_date: String,
    medication: String,
    dosage: String,
    insurance_plan: String,
    has_insurance: String,
    risk_level: String,
    care_priority: String,
    blood_pressure: String,
    heart_rate: String,
    cholesterol: String,
    diabetes: String,
    asthma: String,
    chronic_kidney_disease: String,
    obesity: String,
    smoking_status: String,
    anemia: String,
}

impl CsvRow {
    fn into_record(self) -> Result<PatientRecord, String> {
        let age = self
            .age
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("age is not an integer: {:?}", self.age))?;
        let heart_rate = optional_int("heart_rate", &self.heart_rate)?;
        let cholesterol = optional_int("cholesterol", &self.cholesterol)?;

        Ok(PatientRecord {
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            age,
            gender: self.gender,
            diagnosis: self.diagnosis,
            visit_date: self.visit_date,
            medication: self.medication,
            dosage: self.dosage,
            insurance_plan: self.insurance_plan,
            has_insurance: self.has_insurance,
            risk_level: self.risk_level,
            care_priority: self.care_priority,
            blood_pressure: self.blood_pressure,
            heart_rate,
            cholesterol,
            diabetes: self.diabetes,
            asthma: self.asthma,
            chronic_kidney_disease: self.chronic_kidney_disease,
            obesity: self.obesity,
            smoking_status: self.smoking_status,
            anemia: self.anemia,
        })
    }
}

fn optional_int(column: &str, raw: &str) -> Result<Option<i64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| format!("{column} is not an integer: {raw:?}"))
}

/// Load the CSV at `path` into `conn`.
///
/// An absent file is not an error: the store stays empty and the report
/// says `source_missing`.
pub fn load_csv(conn: &mut Connection, path: &Path) -> Result<LoadReport, DatabaseError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Patient CSV not found, starting with an empty store");
        return Ok(LoadReport {
            source_missing: true,
            ..LoadReport::default()
        });
    }
    let file = std::fs::File::open(path)?;
    load_csv_reader(conn, file)
}

/// Load CSV data from any reader.
pub fn load_csv_reader<R: Read>(conn: &mut Connection, reader: R) -> Result<LoadReport, DatabaseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<&str> = PatientField::ALL
        .iter()
        .map(|f| f.as_str())
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(DatabaseError::InvalidSource(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }

    let tx = conn.transaction()?;
    let mut report = LoadReport::default();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        report.rows_read += 1;
        // +2: header line plus 1-based numbering
        let line = index + 2;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(line, error = %e, "Skipping malformed CSV row");
                report.skipped += 1;
                continue;
            }
        };
        let record = match row.into_record() {
            Ok(record) => record,
            Err(reason) => {
                tracing::warn!(line, %reason, "Skipping CSV row");
                report.skipped += 1;
                continue;
            }
        };

        if insert_patient(&tx, &record)? {
            report.inserted += 1;
        } else {
            tracing::debug!(line, patient_id = %record.patient_id, "Duplicate patient_id ignored");
            report.duplicates += 1;
        }
    }

    tx.commit()?;
    Ok(report)
}
