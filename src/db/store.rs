//! The patient record store.
//!
//! Built once at startup (drop, recreate, bulk load) and read-only after.
//! `load` / `get_by_id` / `query` are its whole contract.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::{
    count_patients, get_patient, load_csv, open_database, open_memory_database, search_patients,
    DatabaseError, LoadReport,
};
use crate::models::{PatientRecord, Predicate};

pub struct RecordStore {
    conn: Mutex<Connection>,
}

impl RecordStore {
    /// Recreate the database file at `db_path` with an empty table.
    pub fn open(db_path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_database(db_path)?),
        })
    }

    /// Store backed by an in-memory database.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_memory_database()?),
        })
    }

    /// Recreate at `db_path` and load `csv_path` into it.
    pub fn open_and_load(db_path: &Path, csv_path: &Path) -> Result<(Self, LoadReport), DatabaseError> {
        let store = Self::open(db_path)?;
        let report = store.load(csv_path)?;
        Ok((store, report))
    }

    pub fn load(&self, csv_path: &Path) -> Result<LoadReport, DatabaseError> {
        let mut conn = self.lock()?;
        let report = load_csv(&mut conn, csv_path)?;
        tracing::info!(
            path = %csv_path.display(),
            inserted = report.inserted,
            duplicates = report.duplicates,
            skipped = report.skipped,
            "Patient store loaded"
        );
        Ok(report)
    }

    pub fn get_by_id(&self, patient_id: &str) -> Result<Option<PatientRecord>, DatabaseError> {
        let conn = self.lock()?;
        get_patient(&conn, patient_id)
    }

    pub fn query(&self, predicate: &Predicate) -> Result<Vec<PatientRecord>, DatabaseError> {
        let conn = self.lock()?;
        search_patients(&conn, predicate)
    }

    pub fn len(&self) -> Result<usize, DatabaseError> {
        let conn = self.lock()?;
        count_patients(&conn)
    }

    pub fn is_empty(&self) -> Result<bool, DatabaseError> {
        Ok(self.len()? == 0)
    }

    #[cfg(test)]
    pub(crate) fn insert(&self, record: &PatientRecord) -> Result<bool, DatabaseError> {
        let conn = self.lock()?;
        super::insert_patient(&conn, record)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::fixtures::patient;

    #[test]
    fn missing_source_yields_empty_store() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, report) = RecordStore::open_and_load(
            &tmp.path().join("database.db"),
            &tmp.path().join("data.csv"),
        )
        .unwrap();
        assert!(report.source_missing);
        assert!(store.is_empty().unwrap());
        assert!(store.query(&Predicate::default()).unwrap().is_empty());
    }

    #[test]
    fn get_by_id_and_query() {
        let store = RecordStore::in_memory().unwrap();
        store.insert(&patient("1", "Ana")).unwrap();
        store.insert(&patient("2", "Ben")).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.get_by_id("2").unwrap().unwrap().patient_name, "Ben");
        assert!(store.get_by_id("3").unwrap().is_none());
        assert_eq!(store.query(&Predicate::default()).unwrap().len(), 2);
    }

    #[test]
    fn open_and_load_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = tmp.path().join("data.csv");
        std::fs::write(
            &csv,
            "patient_id,patient_name,age,gender,diagnosis,visit_date,medication,dosage,insurance_plan,has_insurance,risk_level,care_priority,blood_pressure,heart_rate,cholesterol,diabetes,asthma,chronic_kidney_disease,obesity,smoking_status,anemia\n\
             1,Ana,40,Female,Flu,2024-03-01,X,1mg,Gold,Yes,Low,Routine,120/80,70,150,No,No,No,No,Non-Smoker,No\n\
             2,Ben,52,Male,CKD,2024-03-04,Y,2mg,Basic,No,High,Urgent,150/95,90,230,No,No,Yes,No,Smoker,No\n",
        )
        .unwrap();

        let (store, report) =
            RecordStore::open_and_load(&tmp.path().join("database.db"), &csv).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(store.get_by_id("2").unwrap().unwrap().chronic_kidney_disease, "Yes");
    }
}
