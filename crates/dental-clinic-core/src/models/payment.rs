//! Payment (billing) models.

use serde::{Deserialize, Serialize};

use super::{lenient, present};
use crate::{ClinicError, ClinicResult};

/// Payment method stored when a new payment omits it.
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

/// Payment status stored when a new payment omits it.
pub const DEFAULT_PAYMENT_STATUS: &str = "Completed";

/// A payment record as stored. Amounts carry a single implicit currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub patient_id: String,
    /// Snapshot of the patient's name when the record was written
    pub patient_name: Option<String>,
    /// Snapshot of the patient's address when the record was written
    pub address: Option<String>,
    /// Free-text description of what was billed
    pub treatment: Option<String>,
    pub amount: f64,
    pub date: String,
    pub payment_method: Option<String>,
    pub status: Option<String>,
    pub created_at: String,
}

/// Caller-supplied payment fields for create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentInput {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub address: Option<String>,
    pub treatment: Option<String>,
    #[serde(deserialize_with = "lenient::optional_f64")]
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<String>,
}

impl PaymentInput {
    /// Create an input with the required fields set.
    pub fn new(patient_id: impl Into<String>, amount: f64, date: impl Into<String>) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            amount: Some(amount),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    /// Check the fields required to write a payment.
    pub fn validate(&self) -> ClinicResult<()> {
        if !present(&self.patient_id) || self.amount.is_none() || !present(&self.date) {
            return Err(ClinicError::Validation(
                "Patient ID, amount, and date are required".into(),
            ));
        }
        if self.amount.is_some_and(|amount| !amount.is_finite() || amount < 0.0) {
            return Err(ClinicError::Validation(
                "Amount must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Payment method to store on create.
    pub fn payment_method_or_default(&self) -> &str {
        self.payment_method.as_deref().unwrap_or(DEFAULT_PAYMENT_METHOD)
    }

    /// Status to store on create.
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_PAYMENT_STATUS)
    }
}
