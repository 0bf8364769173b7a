//! Appointment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Appointment, AppointmentInput, DateRange, CANCELLED_STATUS};

const APPOINTMENT_COLUMNS: &str = r#"
    id, patient_id, patient_name, treatment, date, time, status, notes,
    created_at, updated_at
"#;

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        treatment: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        status: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl Database {
    /// Insert an appointment, returning its row id.
    pub fn insert_appointment(&self, input: &AppointmentInput) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                patient_id, patient_name, treatment, date, time, status, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                input.patient_id,
                input.patient_name,
                input.treatment,
                input.date,
                input.time,
                input.status_or_default(),
                input.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite every mutable field of an appointment.
    pub fn update_appointment(&self, id: i64, input: &AppointmentInput) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments SET
                patient_id = ?2, patient_name = ?3, treatment = ?4, date = ?5, time = ?6,
                status = ?7, notes = ?8, updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                input.patient_id,
                input.patient_name,
                input.treatment,
                input.date,
                input.time,
                input.status,
                input.notes,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an appointment by id.
    pub fn get_appointment(&self, id: i64) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS),
                [id],
                appointment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all appointments, latest date first and earliest time within a day.
    pub fn list_appointments(&self) -> DbResult<Vec<Appointment>> {
        self.list_appointments_in(None)
    }

    /// List appointments dated within `range`.
    pub fn list_appointments_in(&self, range: Option<&DateRange>) -> DbResult<Vec<Appointment>> {
        let mut sql = format!("SELECT {} FROM appointments", APPOINTMENT_COLUMNS);
        if range.is_some() {
            sql.push_str(" WHERE date BETWEEN ?1 AND ?2");
        }
        sql.push_str(" ORDER BY date DESC, time ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match range {
            Some(range) => stmt.query_map(
                params![range.start_str(), range.end_str()],
                appointment_from_row,
            )?,
            None => stmt.query_map([], appointment_from_row)?,
        };

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List a patient's appointments.
    pub fn list_appointments_for_patient(&self, patient_id: &str) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM appointments WHERE patient_id = ? ORDER BY date DESC, time ASC, id ASC",
            APPOINTMENT_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], appointment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Soonest non-cancelled appointments dated on or after `from` (`YYYY-MM-DD`).
    pub fn upcoming_appointments(&self, from: &str, limit: usize) -> DbResult<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM appointments
            WHERE date >= ?1 AND COALESCE(status, '') != ?2
            ORDER BY date ASC, time ASC, id ASC
            LIMIT ?3
            "#,
            APPOINTMENT_COLUMNS
        ))?;

        let rows = stmt.query_map(
            params![from, CANCELLED_STATUS, limit as i64],
            appointment_from_row,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete an appointment.
    pub fn delete_appointment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn appointment(date: &str, time: &str, status: Option<&str>) -> AppointmentInput {
        let mut input = AppointmentInput::new("DN001", date, time);
        input.status = status.map(Into::into);
        input
    }

    #[test]
    fn test_insert_default_status() {
        let db = setup_db();
        let id = db
            .insert_appointment(&appointment("2025-02-01", "09:00", None))
            .unwrap();
        let stored = db.get_appointment(id).unwrap().unwrap();
        assert_eq!(stored.status.as_deref(), Some("scheduled"));
        assert_eq!(stored.time, "09:00");
    }

    #[test]
    fn test_list_order() {
        let db = setup_db();
        db.insert_appointment(&appointment("2025-02-01", "14:00", None)).unwrap();
        db.insert_appointment(&appointment("2025-02-01", "09:00", None)).unwrap();
        db.insert_appointment(&appointment("2025-03-01", "10:00", None)).unwrap();

        let listed: Vec<_> = db
            .list_appointments()
            .unwrap()
            .into_iter()
            .map(|a| (a.date, a.time))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("2025-03-01".to_string(), "10:00".to_string()),
                ("2025-02-01".to_string(), "09:00".to_string()),
                ("2025-02-01".to_string(), "14:00".to_string()),
            ]
        );
    }

    #[test]
    fn test_upcoming_skips_past_and_cancelled() {
        let db = setup_db();
        db.insert_appointment(&appointment("2025-05-31", "09:00", None)).unwrap();
        db.insert_appointment(&appointment("2025-06-01", "11:00", Some("cancelled"))).unwrap();
        db.insert_appointment(&appointment("2025-06-01", "10:00", Some("confirmed"))).unwrap();
        db.insert_appointment(&appointment("2025-06-02", "08:00", None)).unwrap();

        let upcoming = db.upcoming_appointments("2025-06-01", 5).unwrap();
        let seen: Vec<_> = upcoming.iter().map(|a| (a.date.as_str(), a.time.as_str())).collect();
        assert_eq!(seen, vec![("2025-06-01", "10:00"), ("2025-06-02", "08:00")]);
    }

    #[test]
    fn test_update_and_delete() {
        let db = setup_db();
        let id = db
            .insert_appointment(&appointment("2025-02-01", "09:00", None))
            .unwrap();

        let mut replacement = appointment("2025-02-02", "10:00", Some("confirmed"));
        replacement.notes = Some("Bring x-rays".into());
        assert!(db.update_appointment(id, &replacement).unwrap());

        let stored = db.get_appointment(id).unwrap().unwrap();
        assert_eq!(stored.date, "2025-02-02");
        assert_eq!(stored.status.as_deref(), Some("confirmed"));
        assert_eq!(stored.notes.as_deref(), Some("Bring x-rays"));

        assert!(db.delete_appointment(id).unwrap());
        assert!(!db.update_appointment(id, &replacement).unwrap());
    }
}
