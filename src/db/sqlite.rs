use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,
    patient_name TEXT,
    age INTEGER,
    gender TEXT,
    diagnosis TEXT,
    visit_date TEXT,
    medication TEXT,
    dosage TEXT,
    insurance_plan TEXT,
    has_insurance TEXT,
    risk_level TEXT,
    care_priority TEXT,
    blood_pressure TEXT,
    heart_rate INTEGER,
    cholesterol INTEGER,
    diabetes TEXT,
    asthma TEXT,
    chronic_kidney_disease TEXT,
    obesity TEXT,
    smoking_status TEXT,
    anemia TEXT
);";

/// Open a fresh SQLite database at `path`.
///
/// Any existing file is removed first: the table is rebuilt from the CSV on
/// every start and never migrated.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Could not remove previous database file");
        }
    }
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    create_schema(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch("PRAGMA journal_mode=DELETE;")?;
    Ok(())
}

/// Create the patients table and clear any rows left in it.
pub fn create_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(SCHEMA)?;
    conn.execute("DELETE FROM patients", [])?;
    Ok(())
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_patients_table() {
        let conn = open_memory_database().unwrap();
        assert_eq!(count_tables(&conn).unwrap(), 1);
    }

    #[test]
    fn reopening_discards_previous_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("database.db");

        {
            let conn = open_database(&path).unwrap();
            conn.execute(
                "INSERT INTO patients (patient_id, patient_name) VALUES ('1', 'Stale')",
                [],
            )
            .unwrap();
        }

        let conn = open_database(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn create_schema_is_idempotent() {
        let conn = open_memory_database().unwrap();
        assert!(create_schema(&conn).is_ok());
    }
}
