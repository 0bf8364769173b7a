//! Dental Clinic Core Library
//!
//! Record keeping for a single dental practice: patients, treatment visits,
//! payments and appointments, plus a dashboard summary and date-filtered
//! reports. Access is gated by operator accounts and bearer tokens.
//!
//! # Architecture
//!
//! ```text
//!   HTTP / CLI caller
//!          │
//!   ┌──────▼──────┐     ┌──────────────┐
//!   │ ClinicCore  │────►│  AccessGate  │  bcrypt + HS256 JWT
//!   └──────┬──────┘     └──────────────┘
//!          │ Arc<Mutex<Database>>
//!   ┌──────▼──────────────────────────────┐
//!   │ patients │ treatments │ payments │ appointments │ users
//!   └──────┬──────────────────────────────┘
//!          │
//!   ┌──────▼──────┐
//!   │ Aggregator  │  dashboard stats, reports
//!   └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite storage, one file per entity
//! - [`models`]: Domain types and input validation
//! - [`auth`]: Credential checks and token issuance
//! - [`reports`]: Dashboard statistics and reports
//! - [`seed`]: Default admin account and demo data

pub mod auth;
pub mod db;
pub mod models;
pub mod reports;
pub mod seed;

pub use auth::{AccessGate, Claims, LoginResponse, VerifyResponse};
pub use db::Database;
pub use models::{
    Appointment, AppointmentInput, Created, DashboardStats, DateRange, Patient, PatientInput,
    Payment, PaymentInput, Report, ReportKind, Treatment, TreatmentInput, UserProfile,
};
pub use reports::Aggregator;

use std::fmt::Display;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tracing::{error, info, warn};

use models::TREATMENT_SLOTS;

// =========================================================================
// Error Types
// =========================================================================

/// Reasons a bearer token is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("Access token required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Errors surfaced to callers of the clinic API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClinicError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error("{0}")]
    NotFound(String),

    /// Storage failure; the message is generic, details go to the log.
    #[error("{0}")]
    Storage(String),

    #[error("Endpoint not found")]
    RouteNotFound,
}

pub type ClinicResult<T> = Result<T, ClinicError>;

/// Log a storage failure and replace it with a caller-safe message.
pub(crate) fn storage_error(context: &str, err: impl Display) -> ClinicError {
    error!(error = %err, "{}", context);
    ClinicError::Storage(context.to_string())
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        storage_error("Database unavailable", format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe entry point to every clinic operation.
#[derive(Clone)]
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
    gate: AccessGate,
}

impl ClinicCore {
    /// Wrap an open database.
    pub fn new(db: Database, gate: AccessGate) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            gate,
        }
    }

    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P, gate: AccessGate) -> ClinicResult<Self> {
        let db = Database::open(path).map_err(|e| storage_error("Failed to open database", e))?;
        Ok(Self::new(db, gate))
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory(gate: AccessGate) -> ClinicResult<Self> {
        let db = Database::open_in_memory()
            .map_err(|e| storage_error("Failed to open database", e))?;
        Ok(Self::new(db, gate))
    }

    fn db(&self) -> ClinicResult<MutexGuard<'_, Database>> {
        Ok(self.db.lock()?)
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Check credentials and issue a token.
    pub fn login(&self, username: &str, password: &str) -> ClinicResult<LoginResponse> {
        let db = self.db()?;
        let response = self.gate.login(&db, username, password)?;
        info!(username = %username, "operator logged in");
        Ok(response)
    }

    /// Validate a raw token.
    pub fn verify(&self, token: &str) -> ClinicResult<VerifyResponse> {
        self.gate.verify(token)
    }

    /// Validate an `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> ClinicResult<Claims> {
        self.gate.authorize(header)
    }

    /// Create the operator account if it does not exist yet.
    pub fn seed_default_admin(&self, username: &str, password: &str) -> ClinicResult<bool> {
        let db = self.db()?;
        seed::seed_default_admin(&db, &self.gate, username, password)
    }

    /// Insert demo records into an empty database.
    pub fn seed_sample_data(&self) -> ClinicResult<usize> {
        let db = self.db()?;
        seed::seed_sample_data(&db).map_err(|e| storage_error("Failed to seed sample data", e))
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// List all patients, newest first.
    pub fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let db = self.db()?;
        db.list_patients()
            .map_err(|e| storage_error("Failed to fetch patients", e))
    }

    /// Get a patient by identifier.
    pub fn get_patient(&self, id: &str) -> ClinicResult<Patient> {
        let db = self.db()?;
        db.get_patient(id)
            .map_err(|e| storage_error("Failed to fetch patient", e))?
            .ok_or_else(|| ClinicError::NotFound("Patient not found".into()))
    }

    /// Register a patient and assign the next `DN###` identifier.
    pub fn create_patient(&self, input: &PatientInput) -> ClinicResult<Created> {
        input.validate()?;
        let db = self.db()?;
        let patient_id = db
            .insert_patient(input)
            .map_err(|e| storage_error("Failed to create patient", e))?;
        let rowid = db.conn().last_insert_rowid();

        info!(patient_id = %patient_id, "patient created");
        Ok(Created {
            message: "Patient created successfully".into(),
            id: rowid,
            patient_id: Some(patient_id),
        })
    }

    /// Replace a patient's fields. The identifier never changes.
    pub fn update_patient(&self, id: &str, input: &PatientInput) -> ClinicResult<String> {
        input.validate_update()?;
        let db = self.db()?;
        let updated = db
            .update_patient(id, input)
            .map_err(|e| storage_error("Failed to update patient", e))?;
        if !updated {
            return Err(ClinicError::NotFound("Patient not found".into()));
        }

        info!(patient_id = %id, "patient updated");
        Ok("Patient updated successfully".into())
    }

    /// Delete a patient. Related records are left in place.
    pub fn delete_patient(&self, id: &str) -> ClinicResult<String> {
        let db = self.db()?;
        let deleted = db
            .delete_patient(id)
            .map_err(|e| storage_error("Failed to delete patient", e))?;
        if !deleted {
            return Err(ClinicError::NotFound("Patient not found".into()));
        }

        info!(patient_id = %id, "patient deleted");
        Ok("Patient deleted successfully".into())
    }

    /// Substring search over name, identifier and phone.
    pub fn search_patients(&self, query: &str) -> ClinicResult<Vec<Patient>> {
        let db = self.db()?;
        db.search_patients(query)
            .map_err(|e| storage_error("Search failed", e))
    }

    // =========================================================================
    // Treatment Operations
    // =========================================================================

    pub fn list_treatments(&self) -> ClinicResult<Vec<Treatment>> {
        let db = self.db()?;
        db.list_treatments()
            .map_err(|e| storage_error("Failed to fetch treatments", e))
    }

    pub fn get_treatment(&self, id: i64) -> ClinicResult<Treatment> {
        let db = self.db()?;
        db.get_treatment(id)
            .map_err(|e| storage_error("Failed to fetch treatment", e))?
            .ok_or_else(|| ClinicError::NotFound("Treatment not found".into()))
    }

    pub fn list_treatments_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<Treatment>> {
        let db = self.db()?;
        db.list_treatments_for_patient(patient_id)
            .map_err(|e| storage_error("Failed to fetch patient treatments", e))
    }

    /// Record a treatment visit. Entries past the seventh slot are dropped.
    pub fn create_treatment(&self, input: &TreatmentInput) -> ClinicResult<Created> {
        input.validate()?;
        warn_slot_overflow(input);
        let db = self.db()?;
        let id = db
            .insert_treatment(input)
            .map_err(|e| storage_error("Failed to create treatment record", e))?;

        info!(treatment_id = id, "treatment created");
        Ok(Created {
            message: "Treatment record created successfully".into(),
            id,
            patient_id: None,
        })
    }

    pub fn update_treatment(&self, id: i64, input: &TreatmentInput) -> ClinicResult<String> {
        input.validate()?;
        warn_slot_overflow(input);
        let db = self.db()?;
        let updated = db
            .update_treatment(id, input)
            .map_err(|e| storage_error("Failed to update treatment", e))?;
        if !updated {
            return Err(ClinicError::NotFound("Treatment not found".into()));
        }

        info!(treatment_id = id, "treatment updated");
        Ok("Treatment updated successfully".into())
    }

    pub fn delete_treatment(&self, id: i64) -> ClinicResult<String> {
        let db = self.db()?;
        let deleted = db
            .delete_treatment(id)
            .map_err(|e| storage_error("Failed to delete treatment", e))?;
        if !deleted {
            return Err(ClinicError::NotFound("Treatment not found".into()));
        }

        info!(treatment_id = id, "treatment deleted");
        Ok("Treatment deleted successfully".into())
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    pub fn list_payments(&self) -> ClinicResult<Vec<Payment>> {
        let db = self.db()?;
        db.list_payments()
            .map_err(|e| storage_error("Failed to fetch payments", e))
    }

    pub fn get_payment(&self, id: i64) -> ClinicResult<Payment> {
        let db = self.db()?;
        db.get_payment(id)
            .map_err(|e| storage_error("Failed to fetch payment", e))?
            .ok_or_else(|| ClinicError::NotFound("Payment not found".into()))
    }

    pub fn list_payments_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<Payment>> {
        let db = self.db()?;
        db.list_payments_for_patient(patient_id)
            .map_err(|e| storage_error("Failed to fetch patient payments", e))
    }

    pub fn create_payment(&self, input: &PaymentInput) -> ClinicResult<Created> {
        input.validate()?;
        let db = self.db()?;
        let id = db
            .insert_payment(input)
            .map_err(|e| storage_error("Failed to create payment record", e))?;

        info!(payment_id = id, "payment recorded");
        Ok(Created {
            message: "Payment record created successfully".into(),
            id,
            patient_id: None,
        })
    }

    pub fn update_payment(&self, id: i64, input: &PaymentInput) -> ClinicResult<String> {
        input.validate()?;
        let db = self.db()?;
        let updated = db
            .update_payment(id, input)
            .map_err(|e| storage_error("Failed to update payment", e))?;
        if !updated {
            return Err(ClinicError::NotFound("Payment not found".into()));
        }

        info!(payment_id = id, "payment updated");
        Ok("Payment updated successfully".into())
    }

    pub fn delete_payment(&self, id: i64) -> ClinicResult<String> {
        let db = self.db()?;
        let deleted = db
            .delete_payment(id)
            .map_err(|e| storage_error("Failed to delete payment", e))?;
        if !deleted {
            return Err(ClinicError::NotFound("Payment not found".into()));
        }

        info!(payment_id = id, "payment deleted");
        Ok("Payment deleted successfully".into())
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    pub fn list_appointments(&self) -> ClinicResult<Vec<Appointment>> {
        let db = self.db()?;
        db.list_appointments()
            .map_err(|e| storage_error("Failed to fetch appointments", e))
    }

    pub fn get_appointment(&self, id: i64) -> ClinicResult<Appointment> {
        let db = self.db()?;
        db.get_appointment(id)
            .map_err(|e| storage_error("Failed to fetch appointment", e))?
            .ok_or_else(|| ClinicError::NotFound("Appointment not found".into()))
    }

    pub fn list_appointments_for_patient(&self, patient_id: &str) -> ClinicResult<Vec<Appointment>> {
        let db = self.db()?;
        db.list_appointments_for_patient(patient_id)
            .map_err(|e| storage_error("Failed to fetch patient appointments", e))
    }

    pub fn create_appointment(&self, input: &AppointmentInput) -> ClinicResult<Created> {
        input.validate()?;
        let db = self.db()?;
        let id = db
            .insert_appointment(input)
            .map_err(|e| storage_error("Failed to create appointment", e))?;

        info!(appointment_id = id, "appointment scheduled");
        Ok(Created {
            message: "Appointment created successfully".into(),
            id,
            patient_id: None,
        })
    }

    pub fn update_appointment(&self, id: i64, input: &AppointmentInput) -> ClinicResult<String> {
        input.validate()?;
        let db = self.db()?;
        let updated = db
            .update_appointment(id, input)
            .map_err(|e| storage_error("Failed to update appointment", e))?;
        if !updated {
            return Err(ClinicError::NotFound("Appointment not found".into()));
        }

        info!(appointment_id = id, "appointment updated");
        Ok("Appointment updated successfully".into())
    }

    pub fn delete_appointment(&self, id: i64) -> ClinicResult<String> {
        let db = self.db()?;
        let deleted = db
            .delete_appointment(id)
            .map_err(|e| storage_error("Failed to delete appointment", e))?;
        if !deleted {
            return Err(ClinicError::NotFound("Appointment not found".into()));
        }

        info!(appointment_id = id, "appointment deleted");
        Ok("Appointment deleted successfully".into())
    }

    // =========================================================================
    // Aggregation
    // =========================================================================

    /// Dashboard summary as of `today`.
    pub fn dashboard_stats(&self, today: NaiveDate) -> ClinicResult<DashboardStats> {
        let db = self.db()?;
        Aggregator::new(&db)
            .dashboard_stats(today)
            .map_err(|e| storage_error("Failed to fetch stats", e))
    }

    /// Rows of one entity, filtered to `[start, end]` when both bounds are given.
    pub fn generate_report(
        &self,
        kind: ReportKind,
        start: Option<&str>,
        end: Option<&str>,
    ) -> ClinicResult<Report> {
        let range = DateRange::from_bounds(start, end)?;
        let db = self.db()?;
        let context = match kind {
            ReportKind::Patients => "Failed to generate patient report",
            ReportKind::Treatments => "Failed to generate treatment report",
            ReportKind::Payments => "Failed to generate payment report",
            ReportKind::Appointments => "Failed to generate appointment report",
        };
        Aggregator::new(&db)
            .generate_report(kind, range.as_ref())
            .map_err(|e| storage_error(context, e))
    }
}

fn warn_slot_overflow(input: &TreatmentInput) {
    let dropped = models::TreatmentSlots::overflow(&input.treatments);
    if dropped > 0 {
        warn!(
            dropped,
            supplied = input.treatments.len(),
            slots = TREATMENT_SLOTS,
            "treatment list exceeds slot count, extra entries dropped"
        );
    }
}
