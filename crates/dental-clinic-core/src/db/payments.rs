//! Payment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{DateRange, Payment, PaymentInput};

const PAYMENT_COLUMNS: &str = r#"
    id, patient_id, patient_name, address, treatment, amount, date,
    payment_method, status, created_at
"#;

fn payment_from_row(row: &Row<'_>) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        patient_name: row.get(2)?,
        address: row.get(3)?,
        treatment: row.get(4)?,
        amount: row.get(5)?,
        date: row.get(6)?,
        payment_method: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl Database {
    /// Insert a payment, returning its row id.
    pub fn insert_payment(&self, input: &PaymentInput) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO payments (
                patient_id, patient_name, address, treatment, amount, date, payment_method, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                input.patient_id,
                input.patient_name,
                input.address,
                input.treatment,
                input.amount,
                input.date,
                input.payment_method_or_default(),
                input.status_or_default(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite every mutable field of a payment.
    pub fn update_payment(&self, id: i64, input: &PaymentInput) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE payments SET
                patient_id = ?2, patient_name = ?3, address = ?4, treatment = ?5, amount = ?6,
                date = ?7, payment_method = ?8, status = ?9
            WHERE id = ?1
            "#,
            params![
                id,
                input.patient_id,
                input.patient_name,
                input.address,
                input.treatment,
                input.amount,
                input.date,
                input.payment_method,
                input.status,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a payment by id.
    pub fn get_payment(&self, id: i64) -> DbResult<Option<Payment>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM payments WHERE id = ?", PAYMENT_COLUMNS),
                [id],
                payment_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all payments, latest date first.
    pub fn list_payments(&self) -> DbResult<Vec<Payment>> {
        self.list_payments_in(None)
    }

    /// List payments dated within `range`, latest date first.
    pub fn list_payments_in(&self, range: Option<&DateRange>) -> DbResult<Vec<Payment>> {
        let mut sql = format!("SELECT {} FROM payments", PAYMENT_COLUMNS);
        if range.is_some() {
            sql.push_str(" WHERE date BETWEEN ?1 AND ?2");
        }
        sql.push_str(" ORDER BY date DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = match range {
            Some(range) => stmt.query_map(
                params![range.start_str(), range.end_str()],
                payment_from_row,
            )?,
            None => stmt.query_map([], payment_from_row)?,
        };

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List a patient's payments, latest date first.
    pub fn list_payments_for_patient(&self, patient_id: &str) -> DbResult<Vec<Payment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM payments WHERE patient_id = ? ORDER BY date DESC, id DESC",
            PAYMENT_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], payment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Latest payments by date.
    pub fn recent_payments(&self, limit: usize) -> DbResult<Vec<Payment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM payments ORDER BY date DESC, id DESC LIMIT ?",
            PAYMENT_COLUMNS
        ))?;
        let rows = stmt.query_map([limit as i64], payment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Sum of all payment amounts, 0 when there are none.
    pub fn total_revenue(&self) -> DbResult<f64> {
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM payments",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Delete a payment.
    pub fn delete_payment(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM payments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
