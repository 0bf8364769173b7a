//! Patient database operations.

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use tracing::warn;

use super::{like_pattern, Database, DbError, DbResult};
use crate::models::{format_patient_id, DateRange, Patient, PatientInput};

const PATIENT_COLUMNS: &str = r#"
    id, name, age, gender, phone, address, blood_group, genotype, occupation,
    religion, state, nationality, marital_status, next_of_kin, past_dental_history,
    family_history, past_medical_history, rhesus, created_at, updated_at
"#;

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        blood_group: row.get(6)?,
        genotype: row.get(7)?,
        occupation: row.get(8)?,
        religion: row.get(9)?,
        state: row.get(10)?,
        nationality: row.get(11)?,
        marital_status: row.get(12)?,
        next_of_kin: row.get(13)?,
        past_dental_history: row.get(14)?,
        family_history: row.get(15)?,
        past_medical_history: row.get(16)?,
        rhesus: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}

fn is_primary_key_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn count_patients_in(conn: &Connection) -> DbResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count as u64)
}

fn next_patient_id_in(conn: &Connection) -> DbResult<String> {
    Ok(format_patient_id(count_patients_in(conn)? + 1))
}

/// Identifier one past the highest numeric `DN` suffix in use.
fn id_after_highest_in(conn: &Connection) -> DbResult<String> {
    let highest: i64 = conn.query_row(
        "SELECT COALESCE(MAX(CAST(SUBSTR(id, 3) AS INTEGER)), 0) FROM patients WHERE id GLOB 'DN[0-9]*'",
        [],
        |row| row.get(0),
    )?;
    Ok(format_patient_id(highest.max(0) as u64 + 1))
}

fn insert_patient_row(conn: &Connection, id: &str, input: &PatientInput) -> rusqlite::Result<usize> {
    conn.execute(
        r#"
        INSERT INTO patients (
            id, name, age, gender, phone, address, blood_group, genotype, occupation,
            religion, state, nationality, marital_status, next_of_kin, past_dental_history,
            family_history, past_medical_history, rhesus
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        "#,
        params![
            id,
            input.name,
            input.age,
            input.gender,
            input.phone,
            input.address,
            input.blood_group,
            input.genotype,
            input.occupation,
            input.religion,
            input.state,
            input.nationality_or_default(),
            input.marital_status,
            input.next_of_kin,
            input.past_dental_history,
            input.family_history,
            input.past_medical_history,
            input.rhesus,
        ],
    )
}

impl Database {
    /// Count patient rows.
    pub fn count_patients(&self) -> DbResult<u64> {
        count_patients_in(&self.conn)
    }

    /// Next sequential patient identifier: row count + 1, formatted `DN###`.
    ///
    /// This is a plain read; [`Database::insert_patient`] is what makes
    /// assignment safe against concurrent creates and deleted-row gaps.
    pub fn next_patient_id(&self) -> DbResult<String> {
        next_patient_id_in(&self.conn)
    }

    /// Insert a new patient, assigning the next free identifier.
    ///
    /// Runs in an IMMEDIATE transaction so no other writer can interleave
    /// between choosing the id and the insert. The count + 1 candidate is
    /// tried first; if a deletion left it taken, the id after the highest
    /// one in use is assigned instead, which is always free while the
    /// write lock is held.
    pub fn insert_patient(&self, input: &PatientInput) -> DbResult<String> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let candidate = next_patient_id_in(&tx)?;
        let patient_id = match insert_patient_row(&tx, &candidate, input) {
            Ok(_) => candidate,
            Err(e) if is_primary_key_conflict(&e) => {
                let fallback = id_after_highest_in(&tx)?;
                warn!(taken = %candidate, assigned = %fallback, "patient id already taken");
                match insert_patient_row(&tx, &fallback, input) {
                    Ok(_) => fallback,
                    Err(e) if is_primary_key_conflict(&e) => {
                        return Err(DbError::Constraint(format!(
                            "patient id {} already taken",
                            fallback
                        )));
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit()?;
        Ok(patient_id)
    }

    /// Overwrite every mutable field of a patient.
    pub fn update_patient(&self, id: &str, input: &PatientInput) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2, age = ?3, gender = ?4, phone = ?5, address = ?6, blood_group = ?7,
                genotype = ?8, occupation = ?9, religion = ?10, state = ?11, nationality = ?12,
                marital_status = ?13, next_of_kin = ?14, past_dental_history = ?15,
                family_history = ?16, past_medical_history = ?17, rhesus = ?18,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                input.name,
                input.age,
                input.gender,
                input.phone,
                input.address,
                input.blood_group,
                input.genotype,
                input.occupation,
                input.religion,
                input.state,
                input.nationality,
                input.marital_status,
                input.next_of_kin,
                input.past_dental_history,
                input.family_history,
                input.past_medical_history,
                input.rhesus,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by identifier.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients, newest first.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        self.list_patients_in(None)
    }

    /// List patients created within `range` (inclusive days), newest first.
    pub fn list_patients_in(&self, range: Option<&DateRange>) -> DbResult<Vec<Patient>> {
        let mut sql = format!("SELECT {} FROM patients", PATIENT_COLUMNS);
        if range.is_some() {
            sql.push_str(" WHERE date(created_at) BETWEEN ?1 AND ?2");
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match range {
            Some(range) => stmt.query_map(
                params![range.start_str(), range.end_str()],
                patient_from_row,
            )?,
            None => stmt.query_map([], patient_from_row)?,
        };

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Most recently created patients.
    pub fn recent_patients(&self, limit: usize) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients ORDER BY created_at DESC, rowid DESC LIMIT ?",
            PATIENT_COLUMNS
        ))?;
        let rows = stmt.query_map([limit as i64], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Case-insensitive substring search over name, id and phone.
    pub fn search_patients(&self, query: &str) -> DbResult<Vec<Patient>> {
        let pattern = like_pattern(query);
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM patients
            WHERE name LIKE ?1 ESCAPE '\' OR id LIKE ?1 ESCAPE '\' OR phone LIKE ?1 ESCAPE '\'
            ORDER BY name, id
            "#,
            PATIENT_COLUMNS
        ))?;

        let rows = stmt.query_map([pattern], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient. Dependent records are left in place.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
