//! Treatment record database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{DateRange, Treatment, TreatmentInput};

const TREATMENT_COLUMNS: &str = r#"
    id, patient_id, patient_name, date, treatment1, treatment2, treatment3,
    treatment4, treatment5, treatment6, treatment7, extra_oral, intra_oral,
    treatment_plan, next_treatment_date, created_at, updated_at
"#;

fn treatment_from_row(row: &Row<'_>) -> rusqlite::Result<Treatment> {
    Ok(Treatment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        date: row.get(3)?,
        treatment1: row.get(4)?,
        treatment2: row.get(5)?,
        treatment3: row.get(6)?,
        treatment4: row.get(7)?,
        treatment5: row.get(8)?,
        treatment6: row.get(9)?,
        treatment7: row.get(10)?,
        extra_oral: row.get(11)?,
        intra_oral: row.get(12)?,
        treatment_plan: row.get(13)?,
        next_treatment_date: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

impl Database {
    /// Insert a treatment record, returning its row id.
    pub fn insert_treatment(&self, input: &TreatmentInput) -> DbResult<i64> {
        let slots = input.slots();
        let [t1, t2, t3, t4, t5, t6, t7] = slots.as_array();

        self.conn.execute(
            r#"
            INSERT INTO treatments (
                patient_id, patient_name, date, treatment1, treatment2, treatment3,
                treatment4, treatment5, treatment6, treatment7, extra_oral, intra_oral,
                treatment_plan, next_treatment_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                input.patient_id,
                input.patient_name,
                input.date,
                t1,
                t2,
                t3,
                t4,
                t5,
                t6,
                t7,
                input.extra_oral,
                input.intra_oral,
                input.treatment_plan,
                input.next_treatment_date,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite every mutable field of a treatment record.
    pub fn update_treatment(&self, id: i64, input: &TreatmentInput) -> DbResult<bool> {
        let slots = input.slots();
        let [t1, t2, t3, t4, t5, t6, t7] = slots.as_array();

        let rows_affected = self.conn.execute(
            r#"
            UPDATE treatments SET
                patient_id = ?2, patient_name = ?3, date = ?4, treatment1 = ?5, treatment2 = ?6,
                treatment3 = ?7, treatment4 = ?8, treatment5 = ?9, treatment6 = ?10, treatment7 = ?11,
                extra_oral = ?12, intra_oral = ?13, treatment_plan = ?14, next_treatment_date = ?15,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                input.patient_id,
                input.patient_name,
                input.date,
                t1,
                t2,
                t3,
                t4,
                t5,
                t6,
                t7,
                input.extra_oral,
                input.intra_oral,
                input.treatment_plan,
                input.next_treatment_date,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a treatment record by id.
    pub fn get_treatment(&self, id: i64) -> DbResult<Option<Treatment>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM treatments WHERE id = ?", TREATMENT_COLUMNS),
                [id],
                treatment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all treatment records, latest date first.
    pub fn list_treatments(&self) -> DbResult<Vec<Treatment>> {
        self.list_treatments_in(None)
    }

    /// List treatment records dated within `range`, latest date first.
    pub fn list_treatments_in(&self, range: Option<&DateRange>) -> DbResult<Vec<Treatment>> {
        let mut sql = format!("SELECT {} FROM treatments", TREATMENT_COLUMNS);
        if range.is_some() {
            sql.push_str(" WHERE date BETWEEN ?1 AND ?2");
        }
        sql.push_str(" ORDER BY date DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match range {
            Some(range) => stmt.query_map(
                params![range.start_str(), range.end_str()],
                treatment_from_row,
            )?,
            None => stmt.query_map([], treatment_from_row)?,
        };

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List a patient's treatment records, latest date first.
    pub fn list_treatments_for_patient(&self, patient_id: &str) -> DbResult<Vec<Treatment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM treatments WHERE patient_id = ? ORDER BY date DESC, id DESC",
            TREATMENT_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], treatment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count treatment records.
    pub fn count_treatments(&self) -> DbResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM treatments", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete a treatment record.
    pub fn delete_treatment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM treatments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_maps_slots() {
        let db = setup_db();

        let mut input = TreatmentInput::new("DN001", "2025-01-10")
            .with_treatments(["Cleaning", "Filling"]);
        input.patient_name = Some("Chinwe Okoro".into());
        input.treatment_plan = Some("Review in 6 months".into());

        let id = db.insert_treatment(&input).unwrap();
        let treatment = db.get_treatment(id).unwrap().unwrap();

        assert_eq!(treatment.treatment1.as_deref(), Some("Cleaning"));
        assert_eq!(treatment.treatment2.as_deref(), Some("Filling"));
        assert_eq!(treatment.treatment3, None);
        assert_eq!(treatment.treatment7, None);
        assert_eq!(treatment.treatments(), vec!["Cleaning", "Filling"]);
        assert_eq!(treatment.patient_name.as_deref(), Some("Chinwe Okoro"));
    }

    #[test]
    fn test_insert_drops_past_seventh() {
        let db = setup_db();
        let input = TreatmentInput::new("DN001", "2025-01-10")
            .with_treatments((1..=9).map(|i| format!("T{}", i)));

        let id = db.insert_treatment(&input).unwrap();
        let treatment = db.get_treatment(id).unwrap().unwrap();
        assert_eq!(treatment.treatments().len(), 7);
        assert_eq!(treatment.treatment7.as_deref(), Some("T7"));
    }

    #[test]
    fn test_update_replaces_slots() {
        let db = setup_db();
        let input = TreatmentInput::new("DN001", "2025-01-10")
            .with_treatments(["Cleaning", "Filling", "Extraction"]);
        let id = db.insert_treatment(&input).unwrap();

        let replacement = TreatmentInput::new("DN001", "2025-01-11").with_treatments(["Root Canal"]);
        assert!(db.update_treatment(id, &replacement).unwrap());

        let treatment = db.get_treatment(id).unwrap().unwrap();
        assert_eq!(treatment.date, "2025-01-11");
        assert_eq!(treatment.treatments(), vec!["Root Canal"]);
        assert_eq!(treatment.treatment3, None);

        assert!(!db.update_treatment(id + 100, &replacement).unwrap());
    }

    #[test]
    fn test_list_by_patient_and_order() {
        let db = setup_db();
        db.insert_treatment(&TreatmentInput::new("DN001", "2025-01-10")).unwrap();
        db.insert_treatment(&TreatmentInput::new("DN001", "2025-03-01")).unwrap();
        db.insert_treatment(&TreatmentInput::new("DN002", "2025-02-01")).unwrap();

        let all = db.list_treatments().unwrap();
        let dates: Vec<_> = all.iter().map(|t| t.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-02-01", "2025-01-10"]);

        let mine = db.list_treatments_for_patient("DN001").unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].date, "2025-03-01");

        assert!(db.list_treatments_for_patient("DN999").unwrap().is_empty());
        assert_eq!(db.count_treatments().unwrap(), 3);
    }

    #[test]
    fn test_delete_treatment() {
        let db = setup_db();
        let id = db.insert_treatment(&TreatmentInput::new("DN001", "2025-01-10")).unwrap();
        assert!(db.delete_treatment(id).unwrap());
        assert!(db.get_treatment(id).unwrap().is_none());
        assert!(!db.delete_treatment(id).unwrap());
    }
}
