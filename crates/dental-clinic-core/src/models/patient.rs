//! Patient models.

use serde::{Deserialize, Serialize};

use super::{lenient, present};
use crate::{ClinicError, ClinicResult};

/// Prefix of every patient identifier.
pub const PATIENT_ID_PREFIX: &str = "DN";

/// Nationality stored when a new patient omits it.
pub const DEFAULT_NATIONALITY: &str = "Nigerian";

/// Format a sequence number as a patient identifier.
///
/// Pads to three digits and never truncates: 1 → `DN001`, 1000 → `DN1000`.
pub fn format_patient_id(sequence: u64) -> String {
    format!("{}{:03}", PATIENT_ID_PREFIX, sequence)
}

/// A patient record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Human-readable identifier (`DN###`), immutable once assigned
    pub id: String,
    pub name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub genotype: Option<String>,
    pub occupation: Option<String>,
    pub religion: Option<String>,
    pub state: Option<String>,
    pub nationality: Option<String>,
    pub marital_status: Option<String>,
    pub next_of_kin: Option<String>,
    pub past_dental_history: Option<String>,
    pub family_history: Option<String>,
    pub past_medical_history: Option<String>,
    pub rhesus: Option<String>,
    /// Creation timestamp (server-assigned)
    pub created_at: String,
    /// Last update timestamp (server-assigned)
    pub updated_at: String,
}

/// Caller-supplied patient fields for create and update.
///
/// Update is a full replace: every field left as `None` is written as NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatientInput {
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional_i64")]
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub blood_group: Option<String>,
    pub genotype: Option<String>,
    pub occupation: Option<String>,
    pub religion: Option<String>,
    pub state: Option<String>,
    pub nationality: Option<String>,
    pub marital_status: Option<String>,
    pub next_of_kin: Option<String>,
    pub past_dental_history: Option<String>,
    pub family_history: Option<String>,
    pub past_medical_history: Option<String>,
    pub rhesus: Option<String>,
}

impl PatientInput {
    /// Create an input with the required fields set.
    pub fn new(name: impl Into<String>, age: i64, gender: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            age: Some(age),
            gender: Some(gender.into()),
            ..Default::default()
        }
    }

    /// Check the fields required to create a patient.
    pub fn validate(&self) -> ClinicResult<()> {
        if !present(&self.name) || self.age.is_none() || !present(&self.gender) {
            return Err(ClinicError::Validation(
                "Name, age, and gender are required".into(),
            ));
        }
        if self.age.is_some_and(|age| age < 0) {
            return Err(ClinicError::Validation("Age must be non-negative".into()));
        }
        Ok(())
    }

    /// Check the fields the store declares NOT NULL (update path).
    pub fn validate_update(&self) -> ClinicResult<()> {
        if !present(&self.name) {
            return Err(ClinicError::Validation("Name is required".into()));
        }
        if self.age.is_some_and(|age| age < 0) {
            return Err(ClinicError::Validation("Age must be non-negative".into()));
        }
        Ok(())
    }

    /// Nationality to store on create (defaults to Nigerian).
    pub fn nationality_or_default(&self) -> &str {
        self.nationality.as_deref().unwrap_or(DEFAULT_NATIONALITY)
    }
}
