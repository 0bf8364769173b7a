//! Dashboard and report integration tests.

use chrono::NaiveDate;
use dental_clinic_core::models::{
    AppointmentInput, PatientInput, PaymentInput, TreatmentInput,
};
use dental_clinic_core::{AccessGate, ClinicCore, ClinicError, Report, ReportKind};

fn core() -> ClinicCore {
    ClinicCore::open_in_memory(AccessGate::new(b"aggregation-secret")).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn populated() -> ClinicCore {
    let core = core();
    for name in ["Chinwe Okoro", "Adebola Johnson", "Ngozi Eze"] {
        core.create_patient(&PatientInput::new(name, 30, "Female")).unwrap();
    }
    core.create_treatment(&TreatmentInput::new("DN001", "2025-01-10")).unwrap();
    core.create_treatment(&TreatmentInput::new("DN002", "2025-02-10")).unwrap();

    let mut transfer = PaymentInput::new("DN001", 100.0, "2025-01-10");
    transfer.patient_name = Some("Chinwe Okoro".into());
    transfer.payment_method = Some("Transfer".into());
    core.create_payment(&transfer).unwrap();
    core.create_payment(&PaymentInput::new("DN002", 250.0, "2025-02-10")).unwrap();

    let mut past = AppointmentInput::new("DN001", "2025-05-31", "09:00 AM");
    past.patient_name = Some("Chinwe Okoro".into());
    core.create_appointment(&past).unwrap();

    let mut cancelled = AppointmentInput::new("DN002", "2025-06-02", "10:30 AM");
    cancelled.status = Some("cancelled".into());
    core.create_appointment(&cancelled).unwrap();

    let mut upcoming = AppointmentInput::new("DN003", "2025-06-01", "02:00 PM");
    upcoming.patient_name = Some("Ngozi Eze".into());
    upcoming.treatment = Some("Root Canal".into());
    core.create_appointment(&upcoming).unwrap();

    core
}

#[test]
fn test_dashboard_totals() {
    let core = populated();
    let stats = core.dashboard_stats(date(2025, 6, 1)).unwrap();

    assert_eq!(stats.total_patients, 3);
    assert_eq!(stats.total_treatments, 2);
    assert_eq!(stats.total_revenue, 350.0);
    assert_eq!(stats.recent_patients.len(), 3);
}

#[test]
fn test_dashboard_projections() {
    let core = populated();
    let stats = core.dashboard_stats(date(2025, 6, 1)).unwrap();

    let payments: Vec<_> = stats
        .recent_payments
        .iter()
        .map(|p| (p.amount, p.method.as_str()))
        .collect();
    assert_eq!(payments, vec![(250.0, "Cash"), (100.0, "Transfer")]);
    assert_eq!(stats.recent_payments[1].patient.as_deref(), Some("Chinwe Okoro"));

    assert_eq!(stats.upcoming_appointments.len(), 1);
    let next = &stats.upcoming_appointments[0];
    assert_eq!(next.patient.as_deref(), Some("Ngozi Eze"));
    assert_eq!(next.treatment.as_deref(), Some("Root Canal"));
    assert_eq!(next.time, "02:00 PM");
}

#[test]
fn test_dashboard_json_shape() {
    let core = populated();
    let stats = core.dashboard_stats(date(2025, 6, 1)).unwrap();
    let json: serde_json::Value = serde_json::to_value(&stats).unwrap();

    assert_eq!(json["totalPatients"], 3);
    assert_eq!(json["totalRevenue"], 350.0);
    assert!(json["recentPayments"][0]["method"].is_string());
    assert!(json["upcomingAppointments"].is_array());
}

#[test]
fn test_report_date_filter_inclusive() {
    let core = populated();

    let report = core
        .generate_report(ReportKind::Treatments, Some("2025-01-10"), Some("2025-02-10"))
        .unwrap();
    assert_eq!(report.len(), 2);

    let report = core
        .generate_report(ReportKind::Payments, Some("2025-02-01"), Some("2025-02-28"))
        .unwrap();
    match report {
        Report::Payments(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].amount, 250.0);
        }
        other => panic!("unexpected report kind {:?}", other.kind()),
    }
}

#[test]
fn test_report_single_bound_is_unfiltered() {
    let core = populated();

    let report = core
        .generate_report(ReportKind::Appointments, Some("2025-06-01"), None)
        .unwrap();
    assert_eq!(report.len(), 3);

    let report = core
        .generate_report(ReportKind::Appointments, None, Some("2025-01-01"))
        .unwrap();
    assert_eq!(report.len(), 3);
}

#[test]
fn test_patient_report_uses_registration_day() {
    let core = populated();
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let report = core
        .generate_report(ReportKind::Patients, Some(&today), Some(&today))
        .unwrap();
    assert_eq!(report.len(), 3);

    let report = core
        .generate_report(ReportKind::Patients, Some("2000-01-01"), Some("2000-12-31"))
        .unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_unknown_report_kind() {
    assert!(matches!(
        "invoices".parse::<ReportKind>(),
        Err(ClinicError::RouteNotFound)
    ));
}
