use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{PatientRecord, Predicate};

const SELECT_COLUMNS: &str = "SELECT patient_id, patient_name, age, gender, diagnosis, visit_date,
     medication, dosage, insurance_plan, has_insurance, risk_level, care_priority,
     blood_pressure, heart_rate, cholesterol, diabetes, asthma, chronic_kidney_disease,
     obesity, smoking_status, anemia
     FROM patients";

/// Insert a record unless its id is already present.
///
/// Returns `true` when the row was written, `false` when an earlier row
/// with the same `patient_id` kept its place.
pub fn insert_patient(conn: &Connection, p: &PatientRecord) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO patients
         (patient_id, patient_name, age, gender, diagnosis, visit_date, medication, dosage,
          insurance_plan, has_insurance, risk_level, care_priority, blood_pressure,
          heart_rate, cholesterol, diabetes, asthma, chronic_kidney_disease,
          obesity, smoking_status, anemia)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
        params![
            p.patient_id,
            p.patient_name,
            p.age,
            p.gender,
            p.diagnosis,
            p.visit_date,
            p.medication,
            p.dosage,
            p.insurance_plan,
            p.has_insurance,
            p.risk_level,
            p.care_priority,
            p.blood_pressure,
            p.heart_rate,
            p.cholesterol,
            p.diabetes,
            p.asthma,
            p.chronic_kidney_disease,
            p.obesity,
            p.smoking_status,
            p.anemia,
        ],
    )?;
    Ok(changed == 1)
}

pub fn get_patient(conn: &Connection, patient_id: &str) -> Result<Option<PatientRecord>, DatabaseError> {
    let sql = format!("{SELECT_COLUMNS} WHERE patient_id = ?1");
    let record = conn
        .query_row(&sql, params![patient_id], patient_from_row)
        .optional()?;
    Ok(record)
}

/// All rows matching `predicate`, in table scan order.
pub fn search_patients(
    conn: &Connection,
    predicate: &Predicate,
) -> Result<Vec<PatientRecord>, DatabaseError> {
    let (sql, values) = match predicate.to_sql() {
        Some((clause, values)) => (format!("{SELECT_COLUMNS} WHERE {clause} ORDER BY rowid"), values),
        None => (format!("{SELECT_COLUMNS} ORDER BY rowid"), Vec::new()),
    };

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), patient_from_row)?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn count_patients(conn: &Connection) -> Result<usize, DatabaseError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count as usize)
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<PatientRecord> {
    Ok(PatientRecord {
        patient_id: row.get(0)?,
        patient_name: text(row, 1)?,
        age: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        gender: text(row, 3)?,
        diagnosis: text(row, 4)?,
        visit_date: text(row, 5)?,
        medication: text(row, 6)?,
        dosage: text(row, 7)?,
        insurance_plan: text(row, 8)?,
        has_insurance: text(row, 9)?,
        risk_level: text(row, 10)?,
        care_priority: text(row, 11)?,
        blood_pressure: text(row, 12)?,
        heart_rate: row.get(13)?,
        cholesterol: row.get(14)?,
        diabetes: text(row, 15)?,
        asthma: text(row, 16)?,
        chronic_kidney_disease: text(row, 17)?,
        obesity: text(row, 18)?,
        smoking_status: text(row, 19)?,
        anemia: text(row, 20)?,
    })
}

/// TEXT columns are nullable in the schema; NULL reads back as "".
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}
