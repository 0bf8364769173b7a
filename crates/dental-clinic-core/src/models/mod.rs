//! Domain models for the dental clinic.

mod appointment;
mod lenient;
mod patient;
mod payment;
mod stats;
mod treatment;
mod user;

pub use appointment::*;
pub use patient::*;
pub use payment::*;
pub use stats::*;
pub use treatment::*;
pub use user::*;

/// Identifier handed back by every create operation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Created {
    /// Success message for the caller
    pub message: String,
    /// Row id (integer for treatments, payments, appointments)
    pub id: i64,
    /// Human-readable patient identifier (patients only)
    #[serde(rename = "patientId", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

/// Treat empty and whitespace-only strings as absent.
pub(crate) fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}
