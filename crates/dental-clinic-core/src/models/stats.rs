//! Dashboard and report models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Appointment, Patient, Payment, Treatment};
use crate::{ClinicError, ClinicResult};

/// Number of rows in each dashboard list.
pub const DASHBOARD_LIST_LIMIT: usize = 5;

/// Summary statistics for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: i64,
    pub total_treatments: i64,
    /// Sum of all payment amounts (0 when there are none)
    pub total_revenue: f64,
    /// Most recently created patients
    pub recent_patients: Vec<Patient>,
    /// Latest payments by date
    pub recent_payments: Vec<RecentPayment>,
    /// Soonest non-cancelled appointments from today on
    pub upcoming_appointments: Vec<UpcomingAppointment>,
}

/// Payment projection shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentPayment {
    pub id: i64,
    /// Patient name snapshot
    pub patient: Option<String>,
    pub treatment: Option<String>,
    pub amount: f64,
    pub date: String,
    pub method: String,
}

impl From<Payment> for RecentPayment {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            patient: payment.patient_name,
            treatment: payment.treatment,
            amount: payment.amount,
            date: payment.date,
            method: payment
                .payment_method
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| super::DEFAULT_PAYMENT_METHOD.to_string()),
        }
    }
}

/// Appointment projection shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpcomingAppointment {
    pub id: i64,
    /// Patient name snapshot
    pub patient: Option<String>,
    pub treatment: Option<String>,
    pub time: String,
    pub status: Option<String>,
}

impl From<Appointment> for UpcomingAppointment {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            patient: appointment.patient_name,
            treatment: appointment.treatment,
            time: appointment.time,
            status: appointment.status,
        }
    }
}

/// Entity a report is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Patients,
    Treatments,
    Payments,
    Appointments,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Patients,
        ReportKind::Treatments,
        ReportKind::Payments,
        ReportKind::Appointments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Patients => "patients",
            ReportKind::Treatments => "treatments",
            ReportKind::Payments => "payments",
            ReportKind::Appointments => "appointments",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(ClinicError::RouteNotFound)
    }
}

/// Inclusive date filter for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a filter from optional query bounds.
    ///
    /// Filtering applies only when both bounds are supplied; a single bound
    /// yields `None`. Supplied bounds must be ISO `YYYY-MM-DD` dates.
    pub fn from_bounds(start: Option<&str>, end: Option<&str>) -> ClinicResult<Option<Self>> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());
        match (start, end) {
            (Some(start), Some(end)) => Ok(Some(Self {
                start: parse_iso_date(start)?,
                end: parse_iso_date(end)?,
            })),
            _ => Ok(None),
        }
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

fn parse_iso_date(value: &str) -> ClinicResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ClinicError::Validation(format!("Invalid date: {}", value)))
}

/// Rows of a generated report.
///
/// Serializes as a plain JSON array of the entity's rows.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Report {
    Patients(Vec<Patient>),
    Treatments(Vec<Treatment>),
    Payments(Vec<Payment>),
    Appointments(Vec<Appointment>),
}

impl Report {
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Patients(_) => ReportKind::Patients,
            Report::Treatments(_) => ReportKind::Treatments,
            Report::Payments(_) => ReportKind::Payments,
            Report::Appointments(_) => ReportKind::Appointments,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Report::Patients(rows) => rows.len(),
            Report::Treatments(rows) => rows.len(),
            Report::Payments(rows) => rows.len(),
            Report::Appointments(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_parse() {
        assert_eq!("payments".parse::<ReportKind>().unwrap(), ReportKind::Payments);
        assert_eq!(ReportKind::Appointments.to_string(), "appointments");
        assert!(matches!(
            "invoices".parse::<ReportKind>(),
            Err(ClinicError::RouteNotFound)
        ));
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        assert_eq!(DateRange::from_bounds(None, None).unwrap(), None);
        assert_eq!(DateRange::from_bounds(Some("2025-01-01"), None).unwrap(), None);
        assert_eq!(DateRange::from_bounds(None, Some("2025-01-31")).unwrap(), None);
        assert_eq!(DateRange::from_bounds(Some(""), Some("2025-01-31")).unwrap(), None);

        let range = DateRange::from_bounds(Some("2025-01-01"), Some("2025-01-31"))
            .unwrap()
            .unwrap();
        assert_eq!(range.start_str(), "2025-01-01");
        assert_eq!(range.end_str(), "2025-01-31");
    }

    #[test]
    fn test_date_range_rejects_malformed() {
        let err = DateRange::from_bounds(Some("01/01/2025"), Some("2025-01-31")).unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
    }

    #[test]
    fn test_recent_payment_method_default() {
        let payment = Payment {
            id: 1,
            patient_id: "DN001".into(),
            patient_name: Some("Ada".into()),
            address: None,
            treatment: Some("Filling".into()),
            amount: 250.0,
            date: "2025-01-05".into(),
            payment_method: None,
            status: Some("Completed".into()),
            created_at: "2025-01-05 10:00:00".into(),
        };
        let recent = RecentPayment::from(payment);
        assert_eq!(recent.method, "Cash");
        assert_eq!(recent.patient.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = DashboardStats {
            total_patients: 3,
            total_treatments: 2,
            total_revenue: 350.0,
            recent_patients: vec![],
            recent_payments: vec![],
            upcoming_appointments: vec![],
        };
        let json = serde_json::to_string_pretty(&stats).unwrap();
        assert!(json.contains("\"totalPatients\": 3"));
        assert!(json.contains("\"totalRevenue\": 350.0"));
        assert!(json.contains("\"upcomingAppointments\""));
    }

    #[test]
    fn test_report_serializes_as_array() {
        let report = Report::Payments(vec![]);
        assert_eq!(serde_json::to_string(&report).unwrap(), "[]");
        assert!(report.is_empty());
        assert_eq!(report.kind(), ReportKind::Payments);
    }
}
