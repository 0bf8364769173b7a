//! Dashboard statistics and date-filtered reports.

use chrono::NaiveDate;
use tracing::debug;

use crate::db::{Database, DbResult};
use crate::models::{DashboardStats, DateRange, Report, ReportKind, DASHBOARD_LIST_LIMIT};

/// Read-only aggregation over the clinic records.
pub struct Aggregator<'a> {
    db: &'a Database,
}

impl<'a> Aggregator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Compute dashboard statistics as of `today`.
    ///
    /// All sub-queries run inside one read transaction so the counts and
    /// lists come from the same snapshot.
    pub fn dashboard_stats(&self, today: NaiveDate) -> DbResult<DashboardStats> {
        let tx = self.db.conn().unchecked_transaction()?;

        let from = today.format("%Y-%m-%d").to_string();
        let stats = DashboardStats {
            total_patients: self.db.count_patients()? as i64,
            total_treatments: self.db.count_treatments()? as i64,
            total_revenue: self.db.total_revenue()?,
            recent_patients: self.db.recent_patients(DASHBOARD_LIST_LIMIT)?,
            recent_payments: self
                .db
                .recent_payments(DASHBOARD_LIST_LIMIT)?
                .into_iter()
                .map(Into::into)
                .collect(),
            upcoming_appointments: self
                .db
                .upcoming_appointments(&from, DASHBOARD_LIST_LIMIT)?
                .into_iter()
                .map(Into::into)
                .collect(),
        };

        tx.commit()?;
        Ok(stats)
    }

    /// List every row of `kind`, optionally restricted to an inclusive date range.
    ///
    /// Patients are filtered on their registration day; the other entities
    /// on their own `date` column.
    pub fn generate_report(&self, kind: ReportKind, range: Option<&DateRange>) -> DbResult<Report> {
        let report = match kind {
            ReportKind::Patients => Report::Patients(self.db.list_patients_in(range)?),
            ReportKind::Treatments => Report::Treatments(self.db.list_treatments_in(range)?),
            ReportKind::Payments => Report::Payments(self.db.list_payments_in(range)?),
            ReportKind::Appointments => {
                Report::Appointments(self.db.list_appointments_in(range)?)
            }
        };

        debug!(kind = %kind, rows = report.len(), filtered = range.is_some(), "report generated");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentInput, PatientInput, PaymentInput, TreatmentInput};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_empty_dashboard() {
        let db = Database::open_in_memory().unwrap();
        let stats = Aggregator::new(&db).dashboard_stats(today()).unwrap();

        assert_eq!(stats.total_patients, 0);
        assert_eq!(stats.total_treatments, 0);
        assert_eq!(stats.total_revenue, 0.0);
        assert!(stats.recent_patients.is_empty());
        assert!(stats.recent_payments.is_empty());
        assert!(stats.upcoming_appointments.is_empty());
    }

    #[test]
    fn test_dashboard_counts_and_lists() {
        let db = Database::open_in_memory().unwrap();
        for name in ["Ada", "Bola", "Chidi"] {
            db.insert_patient(&PatientInput::new(name, 30, "Female")).unwrap();
        }
        db.insert_treatment(&TreatmentInput::new("DN001", "2025-05-01").with_treatments(["Scaling"]))
            .unwrap();
        db.insert_treatment(&TreatmentInput::new("DN002", "2025-05-02")).unwrap();
        db.insert_payment(&PaymentInput::new("DN001", 100.0, "2025-05-01")).unwrap();
        db.insert_payment(&PaymentInput::new("DN002", 250.0, "2025-05-02")).unwrap();

        let mut cancelled = AppointmentInput::new("DN001", "2025-06-03", "09:00");
        cancelled.status = Some("cancelled".into());
        db.insert_appointment(&cancelled).unwrap();
        db.insert_appointment(&AppointmentInput::new("DN002", "2025-05-30", "09:00")).unwrap();
        db.insert_appointment(&AppointmentInput::new("DN003", "2025-06-01", "15:00")).unwrap();

        let stats = Aggregator::new(&db).dashboard_stats(today()).unwrap();
        assert_eq!(stats.total_patients, 3);
        assert_eq!(stats.total_treatments, 2);
        assert_eq!(stats.total_revenue, 350.0);
        assert_eq!(stats.recent_patients.len(), 3);
        assert_eq!(stats.recent_payments[0].amount, 250.0);
        assert_eq!(stats.recent_payments[0].method, "Cash");
        assert_eq!(stats.upcoming_appointments.len(), 1);
        assert_eq!(stats.upcoming_appointments[0].time, "15:00");
    }

    #[test]
    fn test_dashboard_list_limit() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..8 {
            db.insert_patient(&PatientInput::new(format!("Patient {}", i), 20, "Male"))
                .unwrap();
            db.insert_payment(&PaymentInput::new("DN001", 10.0, format!("2025-01-0{}", i + 1)))
                .unwrap();
        }

        let stats = Aggregator::new(&db).dashboard_stats(today()).unwrap();
        assert_eq!(stats.total_patients, 8);
        assert_eq!(stats.recent_patients.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(stats.recent_payments.len(), DASHBOARD_LIST_LIMIT);
        assert_eq!(stats.recent_payments[0].date, "2025-01-08");
    }

    #[test]
    fn test_report_filtering() {
        let db = Database::open_in_memory().unwrap();
        for date in ["2025-01-01", "2025-01-15", "2025-01-31", "2025-02-01"] {
            db.insert_payment(&PaymentInput::new("DN001", 5.0, date)).unwrap();
        }
        let aggregator = Aggregator::new(&db);

        let range = DateRange::from_bounds(Some("2025-01-01"), Some("2025-01-31"))
            .unwrap()
            .unwrap();
        let report = aggregator
            .generate_report(ReportKind::Payments, Some(&range))
            .unwrap();
        assert_eq!(report.kind(), ReportKind::Payments);
        assert_eq!(report.len(), 3);

        let unfiltered = aggregator.generate_report(ReportKind::Payments, None).unwrap();
        assert_eq!(unfiltered.len(), 4);

        let treatments = aggregator.generate_report(ReportKind::Treatments, None).unwrap();
        assert!(treatments.is_empty());
        assert_eq!(serde_json::to_string(&treatments).unwrap(), "[]");
    }

    #[test]
    fn test_patient_report_includes_end_day() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_patient(&PatientInput::new("Ada", 30, "Female")).unwrap();
        db.conn()
            .execute(
                "UPDATE patients SET created_at = '2025-03-10 18:45:00' WHERE id = ?",
                [&id],
            )
            .unwrap();

        let range = DateRange::from_bounds(Some("2025-03-01"), Some("2025-03-10"))
            .unwrap()
            .unwrap();
        let report = Aggregator::new(&db)
            .generate_report(ReportKind::Patients, Some(&range))
            .unwrap();
        assert_eq!(report.len(), 1);
    }
}
