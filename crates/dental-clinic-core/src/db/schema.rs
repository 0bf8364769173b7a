//! SQLite schema definition.

/// Complete database schema for the dental clinic.
///
/// Foreign keys are declared for documentation only. `PRAGMA foreign_keys`
/// is left off, so deleting a patient leaves its treatments, payments and
/// appointments in place.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Operator Accounts
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,                      -- bcrypt hash
    role TEXT DEFAULT 'admin',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,                         -- DN001, DN002, ...
    name TEXT NOT NULL,
    age INTEGER,
    gender TEXT,
    phone TEXT,
    address TEXT,
    blood_group TEXT,
    genotype TEXT,
    occupation TEXT,
    religion TEXT,
    state TEXT,
    nationality TEXT DEFAULT 'Nigerian',
    marital_status TEXT,
    next_of_kin TEXT,
    past_dental_history TEXT,
    family_history TEXT,
    past_medical_history TEXT,
    rhesus TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);

-- ============================================================================
-- Treatments (seven positional slots)
-- ============================================================================

CREATE TABLE IF NOT EXISTS treatments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    patient_name TEXT,                           -- snapshot at write time
    date TEXT NOT NULL,
    treatment1 TEXT,
    treatment2 TEXT,
    treatment3 TEXT,
    treatment4 TEXT,
    treatment5 TEXT,
    treatment6 TEXT,
    treatment7 TEXT,
    extra_oral TEXT,
    intra_oral TEXT,
    treatment_plan TEXT,
    next_treatment_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_treatments_patient ON treatments(patient_id);
CREATE INDEX IF NOT EXISTS idx_treatments_date ON treatments(date);

-- ============================================================================
-- Payments
-- ============================================================================

CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    patient_name TEXT,                           -- snapshot at write time
    address TEXT,                                -- snapshot at write time
    treatment TEXT,
    amount REAL NOT NULL CHECK (amount >= 0),
    date TEXT NOT NULL,
    payment_method TEXT DEFAULT 'Cash',
    status TEXT DEFAULT 'Completed',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_payments_patient ON payments(patient_id);
CREATE INDEX IF NOT EXISTS idx_payments_date ON payments(date);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    patient_name TEXT,                           -- snapshot at write time
    treatment TEXT,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    status TEXT DEFAULT 'scheduled',             -- scheduled, confirmed, pending, cancelled, completed
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);
CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date, time);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_column_defaults() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute("INSERT INTO patients (id, name) VALUES ('DN001', 'Ada')", [])
            .unwrap();
        let nationality: String = conn
            .query_row("SELECT nationality FROM patients WHERE id = 'DN001'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(nationality, "Nigerian");

        conn.execute(
            "INSERT INTO payments (patient_id, amount, date) VALUES ('DN001', 50, '2025-01-01')",
            [],
        )
        .unwrap();
        let (method, status): (String, String) = conn
            .query_row("SELECT payment_method, status FROM payments", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(method, "Cash");
        assert_eq!(status, "Completed");

        conn.execute(
            "INSERT INTO appointments (patient_id, date, time) VALUES ('DN001', '2025-01-01', '09:00 AM')",
            [],
        )
        .unwrap();
        let status: String = conn
            .query_row("SELECT status FROM appointments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, "scheduled");
    }

    #[test]
    fn test_foreign_keys_not_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        // Orphaned rows are allowed
        let result = conn.execute(
            "INSERT INTO treatments (patient_id, date) VALUES ('DN999', '2025-01-01')",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO payments (patient_id, amount, date) VALUES ('DN001', -1, '2025-01-01')",
            [],
        );
        assert!(result.is_err());
    }
}
