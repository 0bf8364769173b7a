//! Appointment models.

use serde::{Deserialize, Serialize};

use super::present;
use crate::{ClinicError, ClinicResult};

/// Status stored when a new appointment omits it.
pub const DEFAULT_APPOINTMENT_STATUS: &str = "scheduled";

/// Status excluded from the upcoming-appointments view.
pub const CANCELLED_STATUS: &str = "cancelled";

/// An appointment as stored.
///
/// `status` is free text; the UI uses scheduled, confirmed, pending,
/// cancelled and completed but the store does not enforce the set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: String,
    /// Snapshot of the patient's name when the record was written
    pub patient_name: Option<String>,
    pub treatment: Option<String>,
    pub date: String,
    pub time: String,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Caller-supplied appointment fields for create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppointmentInput {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub treatment: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentInput {
    /// Create an input with the required fields set.
    pub fn new(
        patient_id: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            date: Some(date.into()),
            time: Some(time.into()),
            ..Default::default()
        }
    }

    /// Check the fields required to write an appointment.
    pub fn validate(&self) -> ClinicResult<()> {
        if !present(&self.patient_id) || !present(&self.date) || !present(&self.time) {
            return Err(ClinicError::Validation(
                "Patient ID, date, and time are required".into(),
            ));
        }
        Ok(())
    }

    /// Status to store on create.
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_APPOINTMENT_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(AppointmentInput::new("DN001", "2025-02-01", "09:00 AM")
            .validate()
            .is_ok());

        let mut input = AppointmentInput::new("DN001", "2025-02-01", "09:00 AM");
        input.time = Some(String::new());
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ClinicError::Validation(ref m) if m == "Patient ID, date, and time are required"));
    }

    #[test]
    fn test_status_default() {
        let mut input = AppointmentInput::new("DN001", "2025-02-01", "09:00 AM");
        assert_eq!(input.status_or_default(), "scheduled");
        input.status = Some("confirmed".into());
        assert_eq!(input.status_or_default(), "confirmed");
    }
}
